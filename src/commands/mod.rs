//! Command Module
//!
//! Resolves tokenized lines against the command table and executes them.
//!
//! ## Architecture
//!
//! ```text
//! TokenSequence
//!       │
//!       ▼
//! ┌─────────────────┐      ┌─────────────────┐
//! │   Dispatcher    │─────>│  CommandTable   │
//! │                 │      │ (name -> entry) │
//! │  - Validate     │      └─────────────────┘
//! │  - Convert args │
//! │  - Execute      │
//! └────────┬────────┘
//!          │
//!          ▼
//!      Response
//! ```
//!
//! ## Supported Commands
//!
//! - `ADD a b` (also `SUM`)
//! - `SUB a b` (also `SUBTRACT`)
//! - `MULT a b`
//! - `DIV a b` (also `DIVIDE`), truncating toward zero
//!
//! Adding a command means adding a [`CommandId`] variant, its arm in
//! [`CommandId::apply`] and a row in the table; the dispatcher itself does
//! not change.

pub mod handler;
pub mod table;

pub use handler::{parse_integer, CommandError, Dispatcher, ExecutionResult};
pub use table::{CommandEntry, CommandId, CommandTable, CALCULATOR_COMMANDS};
