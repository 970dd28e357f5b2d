//! Line Protocol Implementation
//!
//! This module covers everything between raw transport bytes and the text
//! that goes back out: line assembly, tokenizing, and response rendering.
//!
//! ## Modules
//!
//! - `line`: `LineBuffer` cuts a fragmented byte stream into `RawLine`s
//! - `tokenizer`: splits a `RawLine` into a `TokenSequence` or a `ParseError`
//! - `response`: defines `Response` and its wire format
//!
//! ## Example
//!
//! ```
//! use cmdshell::protocol::{LineBuffer, Tokenizer, Response};
//!
//! let mut lines = LineBuffer::new(128);
//! let tokenizer = Tokenizer::default();
//!
//! for line in lines.feed(b"add 1 2\n") {
//!     let tokens = tokenizer.tokenize(&line).unwrap();
//!     assert_eq!(tokens.len(), 3);
//! }
//!
//! assert_eq!(Response::value(3).serialize(), b"3\n");
//! ```

pub mod line;
pub mod response;
pub mod tokenizer;

// Re-export commonly used types for convenience
pub use line::{LineBuffer, RawLine};
pub use response::Response;
pub use tokenizer::{tokenize, ParseError, ParseResult, TokenSequence, Tokenizer};
