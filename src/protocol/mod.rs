//! Protocol Module
//!
//! Defines the line-oriented text protocol spoken between the jig and
//! its clients.
//!
//! ## Request Format
//! ```text
//! <name>[ <arg> ...]\n
//! ```
//!
//! ## Reply Tags
//! - `:` integer
//! - `,` float
//! - `+` string
//! - `-` error message

mod request;
mod reply;
mod codec;

pub use request::Request;
pub use reply::{Reply, Tag, Value};
pub use codec::{
    frame_line, encode_request, encode_reply, decode_reply, decode_value, TERMINATOR,
};
