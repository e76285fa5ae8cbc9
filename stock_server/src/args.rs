//! Command-line arguments for the stock tracker server.
//!
//! This module defines the CLI interface using `clap`. See `main` for
//! end-to-end usage.
use clap::Parser;
use stock_common::net::{COMMAND_PORT, STREAM_PORT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the symbols file (one symbol per line). Falls back to a
    /// built-in default list when missing.
    #[clap(long, default_value = "symbols.txt")]
    pub symbols_file: String,

    /// Seconds between fetch cycles.
    #[clap(long, default_value_t = 60)]
    pub interval_secs: u64,

    /// TCP port for client commands (snapshot query, symbol replacement).
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub command_port: u16,

    /// TCP port on which subscribers receive pushed quote envelopes.
    #[clap(long, default_value_t = STREAM_PORT)]
    pub stream_port: u16,
}
