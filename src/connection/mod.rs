//! Connection Handler Module
//!
//! This module carries the shell over client connections. Each client
//! connection is handled by its own async task with its own [`Shell`], so
//! lines from different clients never share a buffer.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     TCP Listener                            │
//! │                    (main.rs)                                │
//! └──────────────────────┬──────────────────────────────────────┘
//!                        │
//!                        │ accept()
//!                        ▼
//!           ┌────────────────────────┐
//!           │   For each client...   │
//!           └────────────┬───────────┘
//!                        │
//!                        │ spawn task
//!                        ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 ConnectionHandler                           │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐      │
//! │  │ Read bytes  │───>│ Shell       │───>│ Send resp   │      │
//! │  └─────────────┘    └─────────────┘    └─────────────┘      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use cmdshell::connection::{handle_connection, ConnectionStats};
//! use cmdshell::{CommandTable, Dispatcher, Shell, ShellConfig};
//! use std::sync::Arc;
//!
//! let table = Arc::new(CommandTable::calculator());
//! let stats = Arc::new(ConnectionStats::new());
//!
//! // For each accepted connection...
//! let (stream, addr) = listener.accept().await?;
//! let shell = Shell::new(&ShellConfig::default(), Dispatcher::new(Arc::clone(&table)));
//! tokio::spawn(handle_connection(stream, addr, shell, Arc::clone(&stats)));
//! ```
//!
//! [`Shell`]: crate::shell::Shell

pub mod handler;

// Re-export commonly used types
pub use handler::{handle_connection, ConnectionError, ConnectionHandler, ConnectionStats};
