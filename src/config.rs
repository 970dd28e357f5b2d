//! Shell Configuration
//!
//! Settings the host hands to the shell at startup. Everything here is fixed
//! for the lifetime of a connection; a new connection picks up whatever the
//! server was started with.

use thiserror::Error;

/// Default maximum length of one input line, in bytes (terminator excluded).
pub const DEFAULT_MAX_LINE_LEN: usize = 128;

/// Default maximum number of tokens in one line.
pub const DEFAULT_MAX_TOKENS: usize = 16;

/// Default line terminator.
pub const DEFAULT_TERMINATOR: u8 = b'\n';

/// Errors raised when validating a [`ShellConfig`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("maximum line length must be greater than zero")]
    ZeroLineLength,

    #[error("maximum token count must be greater than zero")]
    ZeroTokenCount,
}

/// Configuration for one shell instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellConfig {
    /// Maximum number of bytes accumulated for a single line
    pub max_line_len: usize,
    /// Maximum number of tokens a line may split into
    pub max_tokens: usize,
    /// Byte that ends a line
    pub terminator: u8,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_tokens: DEFAULT_MAX_TOKENS,
            terminator: DEFAULT_TERMINATOR,
        }
    }
}

impl ShellConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_line_len(mut self, max_line_len: usize) -> Self {
        self.max_line_len = max_line_len;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_terminator(mut self, terminator: u8) -> Self {
        self.terminator = terminator;
        self
    }

    /// Checks that the configuration can actually accept a command.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_len == 0 {
            return Err(ConfigError::ZeroLineLength);
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::ZeroTokenCount);
        }
        Ok(())
    }
}
