//! Response Types
//!
//! Every dispatched line produces exactly one `Response`, which is rendered
//! to a fixed, newline-terminated text template before it goes out on the
//! transport.
//!
//! ## Wire Format
//!
//! Value:        `<decimal integer>\n`
//! Error:        `ERROR: <message>\n`
//! Syntax error: `SYNTAX ERROR. Code: <code>\n`
//!
//! ## Examples
//!
//! Value: `-12\n`
//! Error: `ERROR: divide by zero\n`
//! Syntax error: `SYNTAX ERROR. Code: 1\n`

use std::fmt;

/// The line terminator appended to every response
pub const NEWLINE: &[u8] = b"\n";

/// Fixed response prefixes
pub mod prefix {
    pub const ERROR: &[u8] = b"ERROR: ";
    pub const SYNTAX_ERROR: &[u8] = b"SYNTAX ERROR. Code: ";
}

/// A response to one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// A computed integer.
    /// Format: `<integer>\n`
    Value(i64),

    /// A protocol error detected while dispatching.
    /// Format: `ERROR: <message>\n`
    Error(String),

    /// The line could not be tokenized.
    /// Format: `SYNTAX ERROR. Code: <code>\n`
    SyntaxError(u8),
}

impl Response {
    /// Creates a value response.
    pub fn value(n: i64) -> Self {
        Response::Value(n)
    }

    /// Creates an error response.
    ///
    /// # Example
    /// ```
    /// use cmdshell::protocol::response::Response;
    /// let err = Response::error("unknown command");
    /// assert_eq!(err.serialize(), b"ERROR: unknown command\n");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error(message.into())
    }

    /// Creates a syntax error response carrying a tokenizer error code.
    pub fn syntax_error(code: u8) -> Self {
        Response::SyntaxError(code)
    }

    pub fn is_error(&self) -> bool {
        !matches!(self, Response::Value(_))
    }

    /// Serializes the response to the bytes sent over the wire.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_into(&mut buf);
        buf
    }

    /// Serializes the response into an existing buffer.
    pub fn serialize_into(&self, buf: &mut Vec<u8>) {
        match self {
            Response::Value(n) => {
                buf.extend_from_slice(n.to_string().as_bytes());
            }
            Response::Error(message) => {
                buf.extend_from_slice(prefix::ERROR);
                buf.extend_from_slice(message.as_bytes());
            }
            Response::SyntaxError(code) => {
                buf.extend_from_slice(prefix::SYNTAX_ERROR);
                buf.extend_from_slice(code.to_string().as_bytes());
            }
        }
        buf.extend_from_slice(NEWLINE);
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Value(n) => write!(f, "{}", n),
            Response::Error(message) => write!(f, "ERROR: {}", message),
            Response::SyntaxError(code) => write!(f, "SYNTAX ERROR. Code: {}", code),
        }
    }
}
