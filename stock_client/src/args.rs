//! Command-line arguments for the stock tracker client.
//!
//! This module defines the CLI interface using `clap`. See `main` for
//! end-to-end usage.
use clap::Parser;
use stock_common::net::{COMMAND_PORT, STREAM_PORT};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server IP address (IPv4 or IPv6) where the tracker service is running.
    #[clap(long, default_value = "127.0.0.1")]
    pub server_ip: String,

    /// TCP port of the server command channel.
    #[clap(long, default_value_t = COMMAND_PORT)]
    pub command_port: u16,

    /// TCP port of the server subscriber stream.
    #[clap(long, default_value_t = STREAM_PORT)]
    pub stream_port: u16,

    /// Optional path to a text file with symbols to track. When given, the
    /// list is pushed to the server before subscribing. Symbols may be
    /// separated by commas, spaces, or new lines.
    #[clap(long)]
    pub symbols_file: Option<String>,

    /// Query one snapshot, print it, and exit instead of streaming.
    #[clap(long, default_value_t = false)]
    pub snapshot: bool,
}
