//! Command Table
//!
//! Maps command names to command identifiers. Every command has one
//! canonical [`CommandId`] and any number of spellings; lookup ignores case,
//! so `add`, `ADD` and `Add` all resolve the same way.
//!
//! The table is built once at startup and only read afterwards, so a single
//! `Arc<CommandTable>` can be shared by every connection.
//!
//! ## Calculator Commands
//!
//! | Identifier | Spellings                  | Arity |
//! |------------|----------------------------|-------|
//! | `Add`      | `add`, `sum`               | 2     |
//! | `Sub`      | `sub`, `subtract`          | 2     |
//! | `Mult`     | `mult`                     | 2     |
//! | `Div`      | `div`, `divide`            | 2     |

use crate::commands::handler::CommandError;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// Canonical identifier of a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    Add,
    Sub,
    Mult,
    Div,
}

impl CommandId {
    /// Canonical name, used in logs.
    pub fn name(self) -> &'static str {
        match self {
            CommandId::Add => "ADD",
            CommandId::Sub => "SUB",
            CommandId::Mult => "MULT",
            CommandId::Div => "DIV",
        }
    }

    /// Runs the command on already converted arguments.
    ///
    /// Arithmetic is checked: a result that does not fit in an `i64`
    /// (including `i64::MIN / -1`) is an `Overflow` error.
    pub fn apply(self, args: &[i64]) -> Result<i64, CommandError> {
        let (lhs, rhs) = match args {
            [lhs, rhs] => (*lhs, *rhs),
            _ => return Err(CommandError::WrongArgumentCount),
        };

        let result = match self {
            CommandId::Add => lhs.checked_add(rhs),
            CommandId::Sub => lhs.checked_sub(rhs),
            CommandId::Mult => lhs.checked_mul(rhs),
            CommandId::Div => {
                if rhs == 0 {
                    return Err(CommandError::DivideByZero);
                }
                lhs.checked_div(rhs)
            }
        };

        result.ok_or(CommandError::Overflow)
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One row of the command table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEntry {
    pub id: CommandId,
    /// Accepted spellings, matched case-insensitively
    pub names: &'static [&'static str],
    /// Exact number of arguments after the command name
    pub arity: usize,
}

impl CommandEntry {
    pub const fn new(id: CommandId, names: &'static [&'static str], arity: usize) -> Self {
        Self { id, names, arity }
    }
}

/// The calculator command set.
pub const CALCULATOR_COMMANDS: &[CommandEntry] = &[
    CommandEntry::new(CommandId::Add, &["add", "sum"], 2),
    CommandEntry::new(CommandId::Sub, &["sub", "subtract"], 2),
    CommandEntry::new(CommandId::Mult, &["mult"], 2),
    CommandEntry::new(CommandId::Div, &["div", "divide"], 2),
];

/// Case-insensitive lookup from command name to [`CommandEntry`].
#[derive(Debug, Clone)]
pub struct CommandTable {
    entries: Vec<CommandEntry>,
    /// Lowercased spelling -> index into `entries`
    index: HashMap<String, usize>,
    arities: BTreeSet<usize>,
}

impl Default for CommandTable {
    fn default() -> Self {
        Self::calculator()
    }
}

impl CommandTable {
    /// Builds a table from its entries. When two entries share a spelling the
    /// first one wins.
    pub fn new(entries: impl IntoIterator<Item = CommandEntry>) -> Self {
        let entries: Vec<CommandEntry> = entries.into_iter().collect();
        let mut index = HashMap::new();
        let mut arities = BTreeSet::new();

        for (i, entry) in entries.iter().enumerate() {
            arities.insert(entry.arity);
            for name in entry.names {
                index.entry(name.to_ascii_lowercase()).or_insert(i);
            }
        }

        Self {
            entries,
            index,
            arities,
        }
    }

    /// The four-operation integer calculator.
    pub fn calculator() -> Self {
        Self::new(CALCULATOR_COMMANDS.iter().cloned())
    }

    /// Looks up a command by any of its spellings, ignoring case.
    pub fn resolve(&self, name: &str) -> Option<&CommandEntry> {
        self.index
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.entries[i])
    }

    /// True when at least one command takes exactly `count` arguments.
    pub fn accepts_arity(&self, count: usize) -> bool {
        self.arities.contains(&count)
    }

    pub fn entries(&self) -> &[CommandEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
