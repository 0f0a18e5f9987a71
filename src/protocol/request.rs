//! Request definitions
//!
//! A request is one line of whitespace-separated tokens; the first token
//! names the command.

use crate::error::{JigError, Result};

/// A tokenized command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    tokens: Vec<String>,
}

impl Request {
    /// Parse raw datagram bytes into a request
    ///
    /// An empty (or all-whitespace) datagram yields a request with an empty
    /// name and no tokens.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes)
            .map_err(|_| JigError::InvalidArgument("request is not valid UTF-8".to_string()))?;
        Ok(Self::from_line(text))
    }

    /// Tokenize a line of text
    pub fn from_line(line: &str) -> Self {
        let tokens = line.split_ascii_whitespace().map(str::to_string).collect();
        Self { tokens }
    }

    /// Command name; empty if the line had no tokens
    pub fn name(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or("")
    }

    /// Argument tokens after the name
    pub fn args(&self) -> Vec<&str> {
        self.tokens.iter().skip(1).map(String::as_str).collect()
    }

    /// Total token count, name included
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_any_ascii_whitespace() {
        let req = Request::from_line("tec_write  1\t2 3.5\n");
        assert_eq!(req.name(), "tec_write");
        assert_eq!(req.args(), vec!["1", "2", "3.5"]);
        assert_eq!(req.token_count(), 4);
    }

    #[test]
    fn blank_line_has_empty_name() {
        let req = Request::parse(b"  \n").unwrap();
        assert!(req.is_empty());
        assert_eq!(req.name(), "");
        assert_eq!(req.token_count(), 0);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert!(Request::parse(&[0xff, 0xfe, b'\n']).is_err());
    }
}
