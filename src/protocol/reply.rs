//! Reply definitions
//!
//! Represents typed replies sent back to clients.

use std::fmt;

use crate::error::{JigError, Result};

/// Reply type tags (byte 0 of every reply line)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Tag {
    Int = b':',
    Float = b',',
    Text = b'+',
    Error = b'-',
}

impl Tag {
    /// Map a leading byte to its tag
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b':' => Some(Tag::Int),
            b',' => Some(Tag::Float),
            b'+' => Some(Tag::Text),
            b'-' => Some(Tag::Error),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        self as u8 as char
    }
}

/// The result of executing a command
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// `:` base-10 signed integer
    Int(i64),

    /// `,` base-10 float
    Float(f64),

    /// `+` arbitrary text
    Text(String),

    /// `-` human-readable error
    Error(String),
}

impl Reply {
    /// The `+ok` acknowledgement
    pub fn ok() -> Self {
        Reply::Text("ok".to_string())
    }

    /// Create an error reply
    pub fn error(message: impl Into<String>) -> Self {
        Reply::Error(message.into())
    }

    pub fn tag(&self) -> Tag {
        match self {
            Reply::Int(_) => Tag::Int,
            Reply::Float(_) => Tag::Float,
            Reply::Text(_) => Tag::Text,
            Reply::Error(_) => Tag::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Reply::Error(_))
    }

    /// Convert into a value, turning an error reply into `JigError::Remote`
    pub fn into_value(self) -> Result<Value> {
        match self {
            Reply::Int(n) => Ok(Value::Int(n)),
            Reply::Float(x) => Ok(Value::Float(x)),
            Reply::Text(s) => Ok(Value::Text(s)),
            Reply::Error(msg) => Err(JigError::Remote(msg)),
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        match value {
            Value::Int(n) => Reply::Int(n),
            Value::Float(x) => Reply::Float(x),
            Value::Text(s) => Reply::Text(s),
        }
    }
}

/// A successfully decoded reply value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Floats, and integers widened to float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(x) => Some(*x),
            Value::Int(n) => Some(*n as f64),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
        }
    }
}
