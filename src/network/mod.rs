//! Network Module
//!
//! UDP server and client.
//!
//! ## Architecture
//! - Server: single blocking receive loop, one reply per datagram
//! - Client: one send, one blocking receive with timeout, no retries
//! - No session state on either side

mod server;
mod client;

pub use server::{Server, ShutdownHandle};
pub use client::Client;
