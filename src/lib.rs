//! # cmdshell - A Line-Oriented Command Shell
//!
//! cmdshell receives free-form text over a byte stream, splits it into
//! lines and tokens, dispatches recognized commands to handlers, and sends a
//! text response back for every line. The bundled command set is a
//! four-operation integer calculator.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                             cmdshell                                │
//! │                                                                     │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐              │
//! │  │ TCP Server  │───>│ Connection  │───>│   Shell     │              │
//! │  │ (Listener)  │    │  Handler    │    │ (per client)│              │
//! │  └─────────────┘    └─────────────┘    └──────┬──────┘              │
//! │                                               │                     │
//! │                                               ▼                     │
//! │  ┌──────────────┐   ┌─────────────┐    ┌─────────────┐              │
//! │  │ LineBuffer   │──>│ Tokenizer   │───>│ Dispatcher  │              │
//! │  └──────────────┘   └─────────────┘    └──────┬──────┘              │
//! │                                               │                     │
//! │                     ┌─────────────────────────┴───────────────────┐ │
//! │                     │     CommandTable (shared, read-only)        │ │
//! │                     └─────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use cmdshell::Shell;
//!
//! let mut shell = Shell::default();
//!
//! let responses = shell.feed(b"add 10 0\ndiv 10 0\n");
//! assert_eq!(responses[0].serialize(), b"10\n");
//! assert_eq!(responses[1].serialize(), b"ERROR: divide by zero\n");
//! ```
//!
//! ## Protocol
//!
//! Each line is `<command> <arg1> <arg2>`. Command names are
//! case-insensitive:
//!
//! - `ADD` / `SUM`
//! - `SUB` / `SUBTRACT`
//! - `MULT`
//! - `DIV` / `DIVIDE`
//!
//! Responses are one line each:
//!
//! - `<result>` on success
//! - `ERROR: unknown command`
//! - `ERROR: expected a command and two arguments`
//! - `ERROR: 1st argument is not a valid integer` (or `2nd`)
//! - `ERROR: divide by zero`
//! - `ERROR: integer overflow`
//! - `SYNTAX ERROR. Code: N` when the line itself is malformed
//!
//! ## Module Overview
//!
//! - [`config`]: Host-supplied limits (line length, token count, terminator)
//! - [`protocol`]: Line assembly, tokenizer and response format
//! - [`commands`]: Command table and dispatcher
//! - [`shell`]: The pipeline for one byte stream
//! - [`connection`]: Async transport adapter and statistics

pub mod commands;
pub mod config;
pub mod connection;
pub mod protocol;
pub mod shell;

// Re-export commonly used types for convenience
pub use commands::{CommandError, CommandId, CommandTable, Dispatcher};
pub use config::{ConfigError, ShellConfig};
pub use connection::{handle_connection, ConnectionStats};
pub use protocol::{LineBuffer, ParseError, RawLine, Response, TokenSequence, Tokenizer};
pub use shell::Shell;

/// The default port cmdshell listens on
pub const DEFAULT_PORT: u16 = 7070;

/// The default host cmdshell binds to
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Version of cmdshell
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
