//! Shell
//!
//! Ties the pieces together for one byte stream:
//!
//! ```text
//! bytes ──> LineBuffer ──> Tokenizer ──> Dispatcher ──> Response
//! ```
//!
//! A `Shell` owns the line buffer for its stream, so each connection gets
//! its own. Lines are handled strictly one after another, and each line is
//! answered before the next is looked at.

use crate::commands::Dispatcher;
use crate::config::ShellConfig;
use crate::protocol::{LineBuffer, RawLine, Response, Tokenizer};
use tracing::warn;

/// Line-oriented command shell over a single byte stream.
#[derive(Debug)]
pub struct Shell {
    lines: LineBuffer,
    tokenizer: Tokenizer,
    dispatcher: Dispatcher,
}

impl Default for Shell {
    fn default() -> Self {
        Self::new(&ShellConfig::default(), Dispatcher::default())
    }
}

impl Shell {
    pub fn new(config: &ShellConfig, dispatcher: Dispatcher) -> Self {
        Self {
            lines: LineBuffer::from_config(config),
            tokenizer: Tokenizer::from_config(config),
            dispatcher,
        }
    }

    /// Accepts a chunk of bytes and returns the lines it completes.
    pub fn receive(&mut self, chunk: &[u8]) -> Vec<RawLine> {
        self.lines.feed(chunk)
    }

    /// Produces the response for one complete line, if any.
    pub fn handle_line(&self, line: &RawLine) -> Option<Response> {
        if line.is_truncated() {
            warn!(capacity = self.lines.capacity(), "Line exceeded buffer capacity");
        }
        self.dispatcher.dispatch(self.tokenizer.tokenize(line))
    }

    /// Accepts a chunk of bytes and returns the responses, in order, for
    /// every line it completes.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Response> {
        self.receive(chunk)
            .iter()
            .filter_map(|line| self.handle_line(line))
            .collect()
    }

    /// Bytes buffered for a line that has not been terminated yet.
    pub fn pending(&self) -> usize {
        self.lines.pending()
    }

    /// Drops a partially received line, e.g. when the stream ends.
    pub fn reset(&mut self) {
        self.lines.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wire(responses: &[Response]) -> Vec<u8> {
        let mut buf = Vec::new();
        for response in responses {
            response.serialize_into(&mut buf);
        }
        buf
    }

    #[test]
    fn test_feed_single_command() {
        let mut shell = Shell::default();
        assert_eq!(wire(&shell.feed(b"add 10 0\n")), b"10\n");
    }

    #[test]
    fn test_fragmented_input() {
        let mut shell = Shell::default();
        assert!(shell.feed(b"SU").is_empty());
        assert!(shell.feed(b"B 5").is_empty());
        assert_eq!(wire(&shell.feed(b" 3\nmult -4 3\n")), b"2\n-12\n");
    }

    #[test]
    fn test_blank_lines_are_silent() {
        let mut shell = Shell::default();
        assert_eq!(wire(&shell.feed(b"\n\n  \nadd 1 1\n")), b"2\n");
    }

    #[test]
    fn test_long_line_then_recovery() {
        let mut shell = Shell::default();
        let mut input = vec![b'9'; 200];
        input.extend_from_slice(b"\nadd 1 2\n");

        assert_eq!(
            wire(&shell.feed(&input)),
            b"SYNTAX ERROR. Code: 1\n3\n"
        );
    }

    #[test]
    fn test_small_line_limit() {
        let config = ShellConfig::new().with_max_line_len(8);
        let mut shell = Shell::new(&config, Dispatcher::default());

        assert_eq!(wire(&shell.feed(b"add 1 2\n")), b"3\n");
        assert_eq!(wire(&shell.feed(b"add 10 20\n")), b"SYNTAX ERROR. Code: 1\n");
        assert_eq!(wire(&shell.feed(b"add 4 5\n")), b"9\n");
    }

    #[test]
    fn test_crlf_line_at_limit() {
        let config = ShellConfig::new().with_max_line_len(8);
        let mut shell = Shell::new(&config, Dispatcher::default());

        assert_eq!(wire(&shell.feed(b"add 1 22\n")), b"23\n");
        assert_eq!(wire(&shell.feed(b"add 1 22\r\n")), b"23\n");
        assert_eq!(
            wire(&shell.feed(b"add 1 222\r\n")),
            b"SYNTAX ERROR. Code: 1\n"
        );
    }

    #[test]
    fn test_token_limit() {
        let config = ShellConfig::new().with_max_tokens(2);
        let mut shell = Shell::new(&config, Dispatcher::default());
        assert_eq!(wire(&shell.feed(b"add 1 2\n")), b"SYNTAX ERROR. Code: 2\n");
    }

    #[test]
    fn test_every_line_gets_one_response() {
        let mut shell = Shell::default();
        let responses = shell.feed(b"add 1 2\nfoo 1 2\nadd 1\ndiv 1 0\nadd x 1\n\"\n");
        assert_eq!(
            wire(&responses),
            b"3\n\
              ERROR: unknown command\n\
              ERROR: expected a command and two arguments\n\
              ERROR: divide by zero\n\
              ERROR: 1st argument is not a valid integer\n\
              SYNTAX ERROR. Code: 3\n"
                .to_vec()
        );
    }

    #[test]
    fn test_reset_drops_partial_line() {
        let mut shell = Shell::default();
        shell.feed(b"add 1");
        assert_eq!(shell.pending(), 5);
        shell.reset();
        assert_eq!(shell.pending(), 0);
        assert_eq!(wire(&shell.feed(b"sub 2 1\n")), b"1\n");
    }
}
