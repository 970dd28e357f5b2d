//! Connection Handler Module
//!
//! This module drives a [`Shell`] over one client connection. Each client
//! gets its own handler task that runs in a loop, reading bytes and sending
//! responses.
//!
//! ## Connection Lifecycle
//!
//! ```text
//! 1. Client connects
//!        │
//!        ▼
//! 2. ConnectionHandler spawned
//!        │
//!        ▼
//! 3. ┌──────────────────────────────┐
//!    │      Main Loop               │
//!    │                              │
//!    │  ┌─────────────────────────┐ │
//!    │  │ Read bytes from stream  │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │  ┌─────────────────────────┐ │
//!    │  │ For each complete line: │ │
//!    │  │ tokenize, dispatch,     │ │
//!    │  │ send response           │ │
//!    │  └───────────┬─────────────┘ │
//!    │              ▼               │
//!    │         [Loop back]          │
//!    └──────────────────────────────┘
//!        │
//!        ▼
//! 4. Client disconnects / write fails
//!        │
//!        ▼
//! 5. Handler task ends
//! ```
//!
//! The handler is generic over the stream so anything that is
//! `AsyncRead + AsyncWrite` can carry the protocol, not just TCP.

use crate::protocol::{RawLine, Response};
use crate::shell::Shell;
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufWriter};
use tokio::net::TcpStream;
use tracing::{debug, info, trace, warn};

/// Size of a single read from the stream
const READ_CHUNK_SIZE: usize = 1024;

/// Statistics for connection handling
#[derive(Debug, Default)]
pub struct ConnectionStats {
    /// Total number of connections accepted
    pub connections_accepted: AtomicU64,
    /// Currently active connections
    pub active_connections: AtomicU64,
    /// Total lines that produced a response
    pub lines_processed: AtomicU64,
    /// Lines rejected by the tokenizer
    pub syntax_errors: AtomicU64,
    /// Lines answered with an `ERROR:` response
    pub command_errors: AtomicU64,
    /// Total bytes read
    pub bytes_read: AtomicU64,
    /// Total bytes written
    pub bytes_written: AtomicU64,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection_opened(&self) {
        self.connections_accepted.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn response_sent(&self, response: &Response) {
        self.lines_processed.fetch_add(1, Ordering::Relaxed);
        match response {
            Response::Value(_) => {}
            Response::Error(_) => {
                self.command_errors.fetch_add(1, Ordering::Relaxed);
            }
            Response::SyntaxError(_) => {
                self.syntax_errors.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn bytes_read(&self, count: usize) {
        self.bytes_read.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn bytes_written(&self, count: usize) {
        self.bytes_written
            .fetch_add(count as u64, Ordering::Relaxed);
    }
}

/// Handles a single client connection.
///
/// Owns the stream and the client's [`Shell`], so line state never leaks
/// between clients.
pub struct ConnectionHandler<S> {
    /// The transport for this connection
    stream: BufWriter<S>,

    /// Client's address (for logging)
    addr: SocketAddr,

    /// Scratch buffer for reads
    buffer: BytesMut,

    /// Line assembly, tokenizing and dispatch for this client
    shell: Shell,

    /// Connection statistics (shared)
    stats: Arc<ConnectionStats>,
}

impl<S> ConnectionHandler<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Creates a new connection handler.
    ///
    /// # Arguments
    ///
    /// * `stream` - The transport for this connection
    /// * `addr` - The client's address
    /// * `shell` - A fresh shell for this client
    /// * `stats` - Shared connection statistics
    pub fn new(stream: S, addr: SocketAddr, shell: Shell, stats: Arc<ConnectionStats>) -> Self {
        Self {
            stream: BufWriter::new(stream),
            addr,
            buffer: BytesMut::with_capacity(READ_CHUNK_SIZE),
            shell,
            stats,
        }
    }

    /// Runs the main connection loop.
    ///
    /// Reads lines from the client and answers them until the client
    /// disconnects or the transport fails.
    pub async fn run(mut self) -> Result<(), ConnectionError> {
        self.stats.connection_opened();
        info!(client = %self.addr, "Client connected");

        let result = self.main_loop().await;

        match &result {
            Ok(()) => info!(client = %self.addr, "Client disconnected gracefully"),
            Err(e) => match e {
                ConnectionError::ClientDisconnected => {
                    debug!(client = %self.addr, "Client disconnected")
                }
                ConnectionError::IoError(io_err)
                    if io_err.kind() == std::io::ErrorKind::ConnectionReset =>
                {
                    debug!(client = %self.addr, "Connection reset by client")
                }
                _ => warn!(client = %self.addr, error = %e, "Connection error"),
            },
        }

        self.stats.connection_closed();
        result
    }

    /// The main read-dispatch-respond loop.
    async fn main_loop(&mut self) -> Result<(), ConnectionError> {
        loop {
            let data = self.read_more_data().await?;

            for line in self.shell.receive(&data) {
                self.process_line(&line).await?;
            }
        }
    }

    /// Answers one complete line.
    async fn process_line(&mut self, line: &RawLine) -> Result<(), ConnectionError> {
        trace!(client = %self.addr, len = line.len(), "Received line");

        match self.shell.handle_line(line) {
            Some(response) => {
                debug!(client = %self.addr, response = %response, "Dispatched line");
                self.send_response(&response).await
            }
            None => Ok(()),
        }
    }

    /// Reads the next chunk from the stream.
    async fn read_more_data(&mut self) -> Result<BytesMut, ConnectionError> {
        self.buffer.reserve(READ_CHUNK_SIZE);

        let n = self.stream.get_mut().read_buf(&mut self.buffer).await?;

        if n == 0 {
            // End of stream; an unterminated line is simply dropped
            if self.shell.pending() > 0 {
                debug!(
                    client = %self.addr,
                    pending = self.shell.pending(),
                    "Discarding partial line"
                );
                self.shell.reset();
            }
            return Err(ConnectionError::ClientDisconnected);
        }

        self.stats.bytes_read(n);
        trace!(client = %self.addr, bytes = n, "Read data");

        Ok(self.buffer.split())
    }

    /// Sends a response to the client.
    async fn send_response(&mut self, response: &Response) -> Result<(), ConnectionError> {
        let bytes = response.serialize();
        self.stream.write_all(&bytes).await?;
        self.stream.flush().await?;
        self.stats.bytes_written(bytes.len());
        self.stats.response_sent(response);
        trace!(
            client = %self.addr,
            bytes = bytes.len(),
            "Sent response"
        );
        Ok(())
    }
}

/// Errors that end a connection.
///
/// None of these are ever reported to the client; protocol errors are
/// answered in-band by the shell.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    /// I/O error (read or write failed)
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Client closed the stream
    #[error("Client disconnected")]
    ClientDisconnected,
}

/// Handles a TCP client connection.
///
/// This is a convenience function that creates a ConnectionHandler
/// and runs it to completion.
///
/// # Arguments
///
/// * `stream` - The TCP stream for this connection
/// * `addr` - The client's socket address
/// * `shell` - A fresh shell for this client
/// * `stats` - Shared connection statistics
pub async fn handle_connection(
    stream: TcpStream,
    addr: SocketAddr,
    shell: Shell,
    stats: Arc<ConnectionStats>,
) {
    let handler = ConnectionHandler::new(stream, addr, shell, stats);
    if let Err(e) = handler.run().await {
        match e {
            ConnectionError::ClientDisconnected => {}
            ConnectionError::IoError(ref io_err)
                if io_err.kind() == std::io::ErrorKind::ConnectionReset => {}
            _ => {
                debug!(client = %addr, error = %e, "Connection ended with error");
            }
        }
    }
}
