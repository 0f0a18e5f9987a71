//! Protocol codec
//!
//! Encoding and decoding functions for the wire protocol.
//!
//! ## Wire Format
//!
//! ### Request Format
//! ```text
//! <name>[ <arg1> <arg2> ...]\n
//! ```
//!
//! ### Reply Format
//! ```text
//! ┌──────────┬─────────────────────────────┬──────┐
//! │ Tag (1)  │          Payload            │ [\n] │
//! └──────────┴─────────────────────────────┴──────┘
//! ```
//!
//! The trailing terminator is optional on receipt; at most one is stripped.

use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{JigError, Result};
use super::{Reply, Tag, Value};

/// Line terminator appended to every outgoing line
pub const TERMINATOR: char = '\n';

// =============================================================================
// Framing
// =============================================================================

/// Append exactly one terminator unless the line already ends with one
pub fn frame_line(line: &str) -> Cow<'_, str> {
    if line.ends_with(TERMINATOR) {
        Cow::Borrowed(line)
    } else {
        let mut framed = String::with_capacity(line.len() + 1);
        framed.push_str(line);
        framed.push(TERMINATOR);
        Cow::Owned(framed)
    }
}

/// Strip at most one trailing terminator (`\n` or `\r\n`)
fn strip_terminator(bytes: &[u8]) -> &[u8] {
    match bytes {
        [rest @ .., b'\r', b'\n'] => rest,
        [rest @ .., b'\n'] => rest,
        _ => bytes,
    }
}

// =============================================================================
// Request Encoding
// =============================================================================

/// Encode command text as a framed request datagram
pub fn encode_request(command: &str) -> Bytes {
    Bytes::from(frame_line(command).into_owned())
}

// =============================================================================
// Reply Encoding/Decoding
// =============================================================================

/// Encode a reply to bytes
///
/// Format: tag (1) + payload + terminator
pub fn encode_reply(reply: &Reply) -> Bytes {
    let payload = match reply {
        Reply::Int(n) => n.to_string(),
        // Debug keeps round-trip precision and uses exponents for extremes
        Reply::Float(x) => format!("{:?}", x),
        Reply::Text(s) => s.clone(),
        Reply::Error(msg) => msg.clone(),
    };
    let framed = frame_line(&payload);

    let mut message = BytesMut::with_capacity(1 + framed.len());
    message.put_u8(reply.tag() as u8);
    message.put_slice(framed.as_bytes());
    message.freeze()
}

/// Decode a reply from bytes
///
/// A `-` reply decodes to `Reply::Error`; only unrecognized or malformed
/// input is an `Err`.
pub fn decode_reply(bytes: &[u8]) -> Result<Reply> {
    let line = strip_terminator(bytes);

    let Some((&first, payload)) = line.split_first() else {
        return Err(JigError::UnknownResponse(String::new()));
    };

    let tag = Tag::from_byte(first).ok_or_else(|| {
        JigError::UnknownResponse(String::from_utf8_lossy(bytes).into_owned())
    })?;

    let text = std::str::from_utf8(payload).map_err(|_| JigError::MalformedPayload {
        tag: tag.as_char(),
        payload: String::from_utf8_lossy(payload).into_owned(),
    })?;

    let malformed = || JigError::MalformedPayload {
        tag: tag.as_char(),
        payload: text.to_string(),
    };

    match tag {
        Tag::Int => text.trim().parse::<i64>().map(Reply::Int).map_err(|_| malformed()),
        Tag::Float => text.trim().parse::<f64>().map(Reply::Float).map_err(|_| malformed()),
        Tag::Text => Ok(Reply::Text(text.to_string())),
        Tag::Error => Ok(Reply::Error(text.to_string())),
    }
}

/// Decode a reply into a value, raising `JigError::Remote` for `-` replies
pub fn decode_value(bytes: &[u8]) -> Result<Value> {
    decode_reply(bytes)?.into_value()
}
