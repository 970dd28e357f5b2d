//! Command Dispatcher
//!
//! Takes the outcome of tokenizing one line and turns it into exactly one
//! response (or none, for a blank line).
//!
//! ## Dispatch Steps
//!
//! ```text
//!   ParseResult<TokenSequence>
//!          │
//!          ├── Err(parse error) ──────────────> SYNTAX ERROR. Code: N
//!          │
//!          ▼
//!   ┌──────────────┐  no command takes
//!   │ arity check  │  that many args ─────────> WrongArgumentCount
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │   resolve    │  not in table ───────────> UnknownCommand
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │ exact arity  │  mismatch ───────────────> WrongArgumentCount
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │ parse args   │  first bad argument ─────> InvalidInteger(n)
//!   └──────┬───────┘
//!          ▼
//!   ┌──────────────┐
//!   │   execute    │  DivideByZero / Overflow
//!   └──────┬───────┘
//!          ▼
//!        value
//! ```
//!
//! Nothing is carried from one line to the next; the same line always gets
//! the same response.

use crate::commands::table::CommandTable;
use crate::protocol::{ParseResult, Response, TokenSequence};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors detected while dispatching a tokenized line.
///
/// The `Display` text is exactly the message sent after `ERROR: `.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command")]
    UnknownCommand,

    #[error("expected a command and two arguments")]
    WrongArgumentCount,

    /// `position` is 1-based
    #[error("{} argument is not a valid integer", Ordinal::of(.position))]
    InvalidInteger { position: usize },

    #[error("divide by zero")]
    DivideByZero,

    #[error("integer overflow")]
    Overflow,
}

/// Result of executing one command.
pub type ExecutionResult = Result<i64, CommandError>;

/// Formats `1` as `1st`, `2` as `2nd`, and so on.
struct Ordinal(usize);

impl Ordinal {
    fn of(n: &usize) -> Self {
        Ordinal(*n)
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.0;
        let suffix = match (n % 10, n % 100) {
            (_, 11..=13) => "th",
            (1, _) => "st",
            (2, _) => "nd",
            (3, _) => "rd",
            _ => "th",
        };
        write!(f, "{}{}", n, suffix)
    }
}

/// Parses a whole token as a signed integer.
///
/// Only an optional leading sign followed by digits is accepted; anything
/// else in the token, including surrounding whitespace, rejects it.
pub fn parse_integer(token: &str) -> Option<i64> {
    token.parse::<i64>().ok()
}

/// Resolves tokenized lines against a [`CommandTable`] and executes them.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    table: Arc<CommandTable>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(Arc::new(CommandTable::calculator()))
    }
}

impl Dispatcher {
    /// Creates a dispatcher over a shared command table.
    pub fn new(table: Arc<CommandTable>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &CommandTable {
        &self.table
    }

    /// Produces the response for one tokenized line.
    ///
    /// # Returns
    ///
    /// - `None` - The line held no tokens, nothing is sent back
    /// - `Some(response)` - The single response for this line
    pub fn dispatch(&self, outcome: ParseResult<TokenSequence>) -> Option<Response> {
        let tokens = match outcome {
            Ok(tokens) => tokens,
            Err(e) => {
                debug!(code = e.code(), error = %e, "Syntax error");
                return Some(Response::syntax_error(e.code()));
            }
        };

        if tokens.is_empty() {
            return None;
        }

        let response = match self.execute(&tokens) {
            Ok(value) => Response::value(value),
            Err(e) => {
                debug!(
                    command = tokens.get(0).unwrap_or_default(),
                    error = %e,
                    "Command failed"
                );
                Response::error(e.to_string())
            }
        };
        Some(response)
    }

    /// Resolves, validates and runs the command in `tokens`.
    pub fn execute(&self, tokens: &TokenSequence) -> ExecutionResult {
        let (name, args) = tokens
            .split_first()
            .ok_or(CommandError::UnknownCommand)?;

        // No command takes this many arguments, so the name doesn't matter.
        if !self.table.accepts_arity(args.len()) {
            return Err(CommandError::WrongArgumentCount);
        }

        let entry = self
            .table
            .resolve(name)
            .ok_or(CommandError::UnknownCommand)?;

        if args.len() != entry.arity {
            return Err(CommandError::WrongArgumentCount);
        }

        let values = args
            .iter()
            .enumerate()
            .map(|(i, arg)| {
                parse_integer(arg).ok_or(CommandError::InvalidInteger { position: i + 1 })
            })
            .collect::<Result<Vec<i64>, CommandError>>()?;

        let result = entry.id.apply(&values)?;
        debug!(command = %entry.id, args = ?values, result, "Executed command");
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::table::{CommandEntry, CommandId};
    use crate::protocol::{tokenize, ParseError, RawLine};

    fn create_dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(CommandTable::calculator()))
    }

    fn run(dispatcher: &Dispatcher, line: &'static str) -> Option<Vec<u8>> {
        dispatcher
            .dispatch(tokenize(&RawLine::from(line)))
            .map(|r| r.serialize())
    }

    fn respond(line: &'static str) -> Vec<u8> {
        run(&create_dispatcher(), line).unwrap()
    }

    #[test]
    fn test_arithmetic() {
        assert_eq!(respond("add 10 0"), b"10\n");
        assert_eq!(respond("SUB 5 3"), b"2\n");
        assert_eq!(respond("mult -4 3"), b"-12\n");
        assert_eq!(respond("div 10 3"), b"3\n");
        assert_eq!(respond("div -10 3"), b"-3\n");
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(respond("sum 2 2"), b"4\n");
        assert_eq!(respond("SUBTRACT 2 5"), b"-3\n");
        assert_eq!(respond("Divide 9 3"), b"3\n");
    }

    #[test]
    fn test_default_dispatcher_uses_calculator_table() {
        let dispatcher = Dispatcher::default();
        let ids: Vec<CommandId> = dispatcher.table().entries().iter().map(|e| e.id).collect();
        assert_eq!(
            ids,
            [CommandId::Add, CommandId::Sub, CommandId::Mult, CommandId::Div]
        );
        assert!(!dispatcher.table().is_empty());
    }

    #[test]
    fn test_divide_by_zero() {
        assert_eq!(respond("div 10 0"), b"ERROR: divide by zero\n");
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(respond("pow 2 3"), b"ERROR: unknown command\n");
        assert_eq!(respond("addd 1 2"), b"ERROR: unknown command\n");
    }

    #[test]
    fn test_wrong_argument_count() {
        let expected: &[u8] = b"ERROR: expected a command and two arguments\n";
        assert_eq!(respond("add"), expected);
        assert_eq!(respond("add 1"), expected);
        assert_eq!(respond("add 1 2 3"), expected);
        // The count is checked before the name for this command set
        assert_eq!(respond("foo"), expected);
        assert_eq!(respond("foo 1 2 3"), expected);
    }

    #[test]
    fn test_invalid_integer() {
        assert_eq!(
            respond("add foo 3"),
            b"ERROR: 1st argument is not a valid integer\n"
        );
        assert_eq!(
            respond("add 3 foo"),
            b"ERROR: 2nd argument is not a valid integer\n"
        );
        // First bad argument wins
        assert_eq!(
            respond("add x y"),
            b"ERROR: 1st argument is not a valid integer\n"
        );
        // Checked before the divisor is looked at
        assert_eq!(
            respond("div x 0"),
            b"ERROR: 1st argument is not a valid integer\n"
        );
    }

    #[test]
    fn test_strict_integer_parsing() {
        assert_eq!(parse_integer("42"), Some(42));
        assert_eq!(parse_integer("-42"), Some(-42));
        assert_eq!(parse_integer("+42"), Some(42));
        assert_eq!(parse_integer("42abc"), None);
        assert_eq!(parse_integer("4 2"), None);
        assert_eq!(parse_integer("0x10"), None);
        assert_eq!(parse_integer("1.5"), None);
        assert_eq!(parse_integer("-"), None);
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("99999999999999999999"), None);
    }

    #[test]
    fn test_overflow() {
        assert_eq!(
            respond("mult 9223372036854775807 2"),
            b"ERROR: integer overflow\n"
        );
        assert_eq!(
            respond("add 9223372036854775807 -1"),
            b"9223372036854775806\n"
        );
    }

    #[test]
    fn test_empty_line_has_no_response() {
        let dispatcher = create_dispatcher();
        assert_eq!(run(&dispatcher, ""), None);
        assert_eq!(run(&dispatcher, "   "), None);
    }

    #[test]
    fn test_syntax_error_bypasses_resolution() {
        let dispatcher = create_dispatcher();
        let response = dispatcher.dispatch(Err(ParseError::TooManyTokens));
        assert_eq!(response, Some(Response::syntax_error(2)));

        assert_eq!(respond(r#"add "1 2"#), b"SYNTAX ERROR. Code: 3\n");
    }

    #[test]
    fn test_idempotent() {
        let dispatcher = create_dispatcher();
        let first = run(&dispatcher, "mult 6 7");
        let second = run(&dispatcher, "mult 6 7");
        assert_eq!(first, second);
        assert_eq!(first, Some(b"42\n".to_vec()));
    }

    #[test]
    fn test_mixed_arity_table_resolves_first() {
        let table = CommandTable::new([
            CommandEntry::new(CommandId::Add, &["add"], 2),
            CommandEntry::new(CommandId::Sub, &["one"], 1),
        ]);
        let dispatcher = Dispatcher::new(Arc::new(table));

        assert_eq!(
            run(&dispatcher, "foo 1"),
            Some(b"ERROR: unknown command\n".to_vec())
        );
        assert_eq!(
            run(&dispatcher, "add 1"),
            Some(b"ERROR: expected a command and two arguments\n".to_vec())
        );
    }

    #[test]
    fn test_ordinal() {
        let names: Vec<String> = [1, 2, 3, 4, 11, 12, 13, 21, 22, 101]
            .iter()
            .map(|&n| Ordinal(n).to_string())
            .collect();
        assert_eq!(
            names,
            ["1st", "2nd", "3rd", "4th", "11th", "12th", "13th", "21st", "22nd", "101st"]
        );
    }
}
