//! # jigctl
//!
//! Command client and server for the BTL sensor module QA/QC test jig:
//! - Line-oriented text requests over UDP
//! - Typed, single-line replies (`:` int, `,` float, `+` text, `-` error)
//! - A fixed, read-only command table with declared arities
//! - A simulated jig for running without the board attached
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────┐   "bias_vread\n"   ┌──────────────────────┐
//! │        Client        │ ─────────────────▶ │        Server        │
//! │ send / receive/query │ ◀───────────────── │  (one datagram at a  │
//! └──────────────────────┘     ",3.14\n"      │        time)         │
//!                                             └──────────┬───────────┘
//!                                                        │
//!                                             ┌──────────▼───────────┐
//!                                             │     CommandTable     │
//!                                             │ name -> (arity, cmd) │
//!                                             └──────────┬───────────┘
//!                                                        │
//!                                             ┌──────────▼───────────┐
//!                                             │  Hardware (Mutex)    │
//!                                             │  jig / SimulatedJig  │
//!                                             └──────────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod protocol;
pub mod commands;
pub mod hardware;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{JigError, Result};
pub use config::Config;
pub use commands::{jig_commands, Command, CommandTable};
pub use network::{Client, Server};
pub use protocol::{Reply, Value};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of jigctl
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
