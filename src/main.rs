//! cmdshell - A Line-Oriented Command Shell
//!
//! This is the main entry point for the cmdshell server.
//! It sets up the TCP listener and the shared command table, and gives every
//! incoming connection its own shell.

use cmdshell::commands::{CommandTable, Dispatcher};
use cmdshell::config::ShellConfig;
use cmdshell::connection::{handle_connection, ConnectionStats};
use cmdshell::shell::Shell;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Server configuration
struct Config {
    /// Host to bind to
    host: String,
    /// Port to listen on
    port: u16,
    /// Per-connection shell settings
    shell: ShellConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: cmdshell::DEFAULT_HOST.to_string(),
            port: cmdshell::DEFAULT_PORT,
            shell: ShellConfig::default(),
        }
    }
}

impl Config {
    /// Parse configuration from command-line arguments
    fn from_args() -> Self {
        let mut config = Config::default();
        let args: Vec<String> = std::env::args().collect();

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    config.host = option_value(&args, i).to_string();
                    i += 2;
                }
                "--port" | "-p" => {
                    config.port = parse_value(&args, i, "port number");
                    i += 2;
                }
                "--max-line" => {
                    config.shell.max_line_len = parse_value(&args, i, "line length");
                    i += 2;
                }
                "--max-tokens" => {
                    config.shell.max_tokens = parse_value(&args, i, "token count");
                    i += 2;
                }
                "--help" => {
                    print_help();
                    std::process::exit(0);
                }
                "--version" | "-v" => {
                    println!("cmdshell version {}", cmdshell::VERSION);
                    std::process::exit(0);
                }
                _ => {
                    eprintln!("Unknown argument: {}", args[i]);
                    print_help();
                    std::process::exit(1);
                }
            }
        }

        if let Err(e) = config.shell.validate() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }

        config
    }

    /// Returns the bind address as a string
    fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Returns the value following the option at `i`, or exits.
fn option_value(args: &[String], i: usize) -> &str {
    match args.get(i + 1) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("Error: {} requires a value", args[i]);
            std::process::exit(1);
        }
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, what: &str) -> T {
    option_value(args, i).parse().unwrap_or_else(|_| {
        eprintln!("Error: invalid {}", what);
        std::process::exit(1);
    })
}

fn print_help() {
    println!(
        r#"
cmdshell - A Line-Oriented Command Shell

USAGE:
    cmdshell [OPTIONS]

OPTIONS:
    -h, --host <HOST>        Host to bind to (default: 127.0.0.1)
    -p, --port <PORT>        Port to listen on (default: 7070)
        --max-line <BYTES>   Maximum line length (default: 128)
        --max-tokens <N>     Maximum tokens per line (default: 16)
    -v, --version            Print version information
        --help               Print this help message

ENVIRONMENT:
    RUST_LOG                 Log filter (default: info)

CONNECTING:
    $ nc 127.0.0.1 7070
    add 10 0
    10
    div 10 0
    ERROR: divide by zero
    SUB 5 3
    2
"#
    );
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let config = Config::from_args();

    // Set up logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();

    info!("cmdshell v{} starting", cmdshell::VERSION);

    // The command table is built once and shared read-only by every connection
    let table = Arc::new(CommandTable::calculator());
    info!(commands = table.len(), "Command table initialized");
    info!(
        max_line_len = config.shell.max_line_len,
        max_tokens = config.shell.max_tokens,
        "Shell configured"
    );

    let stats = Arc::new(ConnectionStats::new());

    // Bind the TCP listener
    let listener = TcpListener::bind(config.bind_address()).await?;
    info!("Listening on {}", config.bind_address());

    // Set up graceful shutdown
    let shutdown = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Shutdown signal received, stopping server...");
    };

    // Main accept loop
    tokio::select! {
        _ = accept_loop(listener, table, config.shell, stats) => {}
        _ = shutdown => {}
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Main loop that accepts incoming connections
async fn accept_loop(
    listener: TcpListener,
    table: Arc<CommandTable>,
    shell_config: ShellConfig,
    stats: Arc<ConnectionStats>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                // Each connection gets its own line buffer
                let shell = Shell::new(&shell_config, Dispatcher::new(Arc::clone(&table)));
                let stats = Arc::clone(&stats);

                tokio::spawn(async move {
                    handle_connection(stream, addr, shell, stats).await;
                });
            }
            Err(e) => {
                error!("Failed to accept connection: {}", e);
            }
        }
    }
}
