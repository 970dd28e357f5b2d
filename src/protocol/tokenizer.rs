//! Command Line Tokenizer
//!
//! Splits one complete line into whitespace-delimited tokens.
//!
//! ## Rules
//!
//! - Runs of whitespace separate tokens; leading and trailing whitespace is ignored.
//! - A double quote toggles quoted mode. Whitespace inside quotes belongs to
//!   the token and the quote characters themselves are removed, so
//!   `say "hello world"` yields `["say", "hello world"]`.
//! - A backslash takes the next character literally (`a\ b` is one token).
//! - Tokens that end up empty (`""`) are dropped.
//! - An empty line yields an empty [`TokenSequence`]; that is not an error.
//!
//! ## Error Codes
//!
//! Failures carry a stable numeric code that goes out on the wire in
//! `SYNTAX ERROR. Code: N` responses:
//!
//! | Code | Error               |
//! |------|---------------------|
//! | 1    | `LineTooLong`       |
//! | 2    | `TooManyTokens`     |
//! | 3    | `UnterminatedQuote` |
//! | 4    | `InvalidUtf8`       |

use crate::config::{ShellConfig, DEFAULT_MAX_TOKENS};
use crate::protocol::line::RawLine;
use std::mem;
use thiserror::Error;

/// Errors that can occur while tokenizing a line.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseError {
    /// The line overflowed the line buffer before its terminator arrived
    #[error("line too long")]
    LineTooLong,

    /// The line holds more tokens than the tokenizer accepts
    #[error("too many tokens")]
    TooManyTokens,

    /// A double quote was opened but never closed
    #[error("unterminated quote")]
    UnterminatedQuote,

    /// The line is not valid UTF-8
    #[error("invalid UTF-8")]
    InvalidUtf8,
}

impl ParseError {
    /// The stable numeric code reported to the client.
    pub const fn code(self) -> u8 {
        match self {
            ParseError::LineTooLong => 1,
            ParseError::TooManyTokens => 2,
            ParseError::UnterminatedQuote => 3,
            ParseError::InvalidUtf8 => 4,
        }
    }
}

/// Result type for tokenizing.
pub type ParseResult<T> = Result<T, ParseError>;

/// The tokens of one line, in left-to-right order. No token is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenSequence {
    tokens: Vec<String>,
}

impl TokenSequence {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.tokens.get(index).map(String::as_str)
    }

    /// Splits into the command name and its arguments.
    pub fn split_first(&self) -> Option<(&str, &[String])> {
        self.tokens
            .split_first()
            .map(|(name, args)| (name.as_str(), args))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.tokens
    }
}

/// Splits raw lines into [`TokenSequence`]s.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    max_tokens: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_TOKENS)
    }
}

impl Tokenizer {
    pub fn new(max_tokens: usize) -> Self {
        Self { max_tokens }
    }

    pub fn from_config(config: &ShellConfig) -> Self {
        Self::new(config.max_tokens)
    }

    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Tokenizes one line.
    ///
    /// # Returns
    ///
    /// - `Ok(tokens)` - The tokens, possibly none for a blank line
    /// - `Err(e)` - The line is malformed; `e.code()` goes to the client
    pub fn tokenize(&self, line: &RawLine) -> ParseResult<TokenSequence> {
        if line.is_truncated() {
            return Err(ParseError::LineTooLong);
        }

        let text =
            std::str::from_utf8(line.as_bytes()).map_err(|_| ParseError::InvalidUtf8)?;

        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut chars = text.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => current.push(escaped),
                    None => current.push('\\'),
                },
                '"' => quoted = !quoted,
                c if c.is_whitespace() && !quoted => self.push_token(&mut tokens, &mut current)?,
                c => current.push(c),
            }
        }

        if quoted {
            return Err(ParseError::UnterminatedQuote);
        }
        self.push_token(&mut tokens, &mut current)?;

        Ok(TokenSequence { tokens })
    }

    fn push_token(&self, tokens: &mut Vec<String>, current: &mut String) -> ParseResult<()> {
        if current.is_empty() {
            return Ok(());
        }
        if tokens.len() >= self.max_tokens {
            return Err(ParseError::TooManyTokens);
        }
        tokens.push(mem::take(current));
        Ok(())
    }
}

/// Tokenizes a line with the default token limit.
pub fn tokenize(line: &RawLine) -> ParseResult<TokenSequence> {
    Tokenizer::default().tokenize(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &'static str) -> Vec<String> {
        tokenize(&RawLine::from(input)).unwrap().into_vec()
    }

    #[test]
    fn test_simple_command() {
        assert_eq!(tokens("add 10 0"), vec!["add", "10", "0"]);
    }

    #[test]
    fn test_whitespace_runs_and_edges() {
        assert_eq!(tokens("  SUB \t 5   3  "), vec!["SUB", "5", "3"]);
    }

    #[test]
    fn test_empty_line() {
        let seq = tokenize(&RawLine::from("")).unwrap();
        assert!(seq.is_empty());

        let seq = tokenize(&RawLine::from(" \t  ")).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_quoted_token_keeps_whitespace() {
        assert_eq!(
            tokens(r#"echo "hello world" x"#),
            vec!["echo", "hello world", "x"]
        );
        assert_eq!(tokens(r#"a"b c"d"#), vec!["ab cd"]);
    }

    #[test]
    fn test_empty_quotes_are_dropped() {
        assert_eq!(tokens(r#"add "" 1 2"#), vec!["add", "1", "2"]);
    }

    #[test]
    fn test_backslash_escape() {
        assert_eq!(tokens(r"a\ b c"), vec!["a b", "c"]);
        assert_eq!(tokens(r#"say \"hi"#), vec!["say", "\"hi"]);
        assert_eq!(tokens(r"end\"), vec![r"end\"]);
    }

    #[test]
    fn test_unterminated_quote() {
        let result = tokenize(&RawLine::from(r#"add "1 2"#));
        assert_eq!(result, Err(ParseError::UnterminatedQuote));
    }

    #[test]
    fn test_too_many_tokens() {
        let tokenizer = Tokenizer::new(3);
        assert_eq!(tokenizer.max_tokens(), 3);
        assert!(tokenizer.tokenize(&RawLine::from("a b c")).is_ok());
        assert_eq!(
            tokenizer.tokenize(&RawLine::from("a b c d")),
            Err(ParseError::TooManyTokens)
        );
    }

    #[test]
    fn test_default_limit_is_sixteen() {
        let sixteen = RawLine::new("t ".repeat(16));
        assert_eq!(tokenize(&sixteen).unwrap().len(), 16);

        let seventeen = RawLine::new("t ".repeat(17));
        assert_eq!(tokenize(&seventeen), Err(ParseError::TooManyTokens));
    }

    #[test]
    fn test_truncated_line() {
        let mut buf = crate::protocol::line::LineBuffer::new(4);
        let lines = buf.feed(b"add 1 2\n");
        assert_eq!(tokenize(&lines[0]), Err(ParseError::LineTooLong));
    }

    #[test]
    fn test_invalid_utf8() {
        let line = RawLine::new(&b"add \xff 2"[..]);
        assert_eq!(tokenize(&line), Err(ParseError::InvalidUtf8));
    }

    #[test]
    fn test_codes_are_stable() {
        assert_eq!(ParseError::LineTooLong.code(), 1);
        assert_eq!(ParseError::TooManyTokens.code(), 2);
        assert_eq!(ParseError::UnterminatedQuote.code(), 3);
        assert_eq!(ParseError::InvalidUtf8.code(), 4);
    }

    #[test]
    fn test_split_first() {
        let seq = tokenize(&RawLine::from("div 9 3")).unwrap();
        let (name, args) = seq.split_first().unwrap();
        assert_eq!(name, "div");
        assert_eq!(args, ["9", "3"]);
        assert_eq!(seq.get(2), Some("3"));
        assert_eq!(seq.iter().collect::<Vec<_>>(), ["div", "9", "3"]);
    }

    #[test]
    fn test_deterministic() {
        let line = RawLine::from("mult -4 3");
        assert_eq!(tokenize(&line), tokenize(&line));
    }
}
