//! Stock Tracker Client — a TCP client that subscribes to the tracker
//! server's quote stream and prints received envelopes to stdout. It can
//! optionally push a replacement symbol list (read from a text file) before
//! subscribing, or query a single snapshot and exit.
//!
//! Usage examples (CLI):
//! ```bash
//! stock_client --server-ip 192.168.0.10
//! stock_client --symbols-file ./symbols.txt
//! stock_client --snapshot
//! ```
//!
//! The symbols file may contain symbols separated by commas, spaces, or new
//! lines. Records with `status=error` are rendered as an explicit
//! unavailable state with their diagnostic; metrics the source did not
//! provide are rendered as a dash, never as zero.
#![warn(missing_docs)]
mod args;
mod sender;

use crate::args::Args;
use crate::sender::CommandSender;
use clap::Parser;
use log::{debug, error, info};
use stock_common::envelope::Envelope;
use stock_common::net::addr;
use stock_common::quote::{Metric, Quote, QuoteStatus};
use stock_common::symbols::parse_from_reader;
use stock_common::Result;
use stock_common::TrackerError;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::net::{Shutdown, TcpStream};
use std::path::PathBuf;

fn main() -> Result<(), TrackerError> {
    init_logger();
    let args = Args::parse();
    let command_addr = addr(&args.server_ip, args.command_port);

    if let Some(raw_path) = &args.symbols_file {
        let path = normalize_path(raw_path);
        let file = File::open(&path).map_err(|e| {
            TrackerError::Format(format!("Cannot open symbols file {}: {e}", path.display()))
        })?;
        let symbols = parse_from_reader(BufReader::new(file))?;
        info!("Pushing symbols: {:?}", symbols);
        CommandSender::set_symbols(&command_addr, symbols)?;
    }

    if args.snapshot {
        let envelope = CommandSender::request_snapshot(&command_addr)?;
        print_envelope(&envelope);
        return Ok(());
    }

    let stream_addr = addr(&args.server_ip, args.stream_port);
    info!("Connecting to quote stream at {}", stream_addr);
    let stream = TcpStream::connect(&stream_addr)
        .map_err(|e| TrackerError::Format(format!("Failed to connect to server: {e}")))?;

    {
        let stream = stream.try_clone()?;
        ctrlc::set_handler(move || {
            info!("Ctrl+C received. Shutting down client...");
            let _ = stream.shutdown(Shutdown::Both);
        })
        .map_err(|e| TrackerError::Format(format!("Error setting Ctrl+C handler: {e}")))?;
    }

    info!("Client is running. Press Ctrl+C to exit.");
    receive_loop(stream)?;
    info!("Client stopped");
    Ok(())
}

/// Runs a blocking loop that reads newline-delimited JSON envelopes from
/// the stream and prints them. Returns when the connection closes.
fn receive_loop(stream: TcpStream) -> Result<(), TrackerError> {
    let mut reader = BufReader::new(stream);
    let mut line = String::new();
    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => match serde_json::from_str::<Envelope>(line.trim_end()) {
                Ok(envelope) => print_envelope(&envelope),
                Err(_) => debug!("Received non-JSON message: {}", line.trim_end()),
            },
            Err(e) => {
                error!("Receive data error: {}", e);
                break;
            }
        }
    }
    Ok(())
}

/// Prints one envelope, tagging the snapshot replay distinctly from
/// incremental updates.
fn print_envelope(envelope: &Envelope) {
    info!(
        "{}: {} records",
        envelope.kind.to_string().to_uppercase(),
        envelope.records.len()
    );
    for record in &envelope.records {
        info!("  {}", format_quote(record));
    }
}

/// Renders one record; error-status records become an explicit unavailable
/// state instead of being hidden.
fn format_quote(quote: &Quote) -> String {
    if quote.status == QuoteStatus::Error {
        let diagnostic = quote.error.as_deref().unwrap_or("unknown error");
        return format!("{}: unavailable ({})", quote.symbol, diagnostic);
    }
    format!(
        "{} [{}] price={:.2} change={:+.2} ({:+.2}%) cap={} vol={} at={}",
        quote.symbol,
        quote.company_name,
        quote.price,
        quote.change,
        quote.change_percent,
        format_metric(&quote.market_cap),
        format_metric(&quote.volume),
        format_time(quote.observed_at),
    )
}

/// A dash for unavailable metrics; zero stays `0`.
fn format_metric(metric: &Metric) -> String {
    match metric {
        Metric::Value(v) => format!("{v:.0}"),
        Metric::Unavailable => "-".to_string(),
    }
}

/// Formats the observation timestamp as wall-clock UTC time.
fn format_time(ms: u64) -> String {
    chrono::DateTime::from_timestamp_millis(ms as i64)
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| ms.to_string())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}

/// Normalize a CLI-provided path string by trimming whitespace and matching
/// quotes. This allows passing Windows paths in quotes without breaking
/// parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_common::quote::timestamp_ms;

    #[test]
    fn error_records_render_as_unavailable() {
        let quote = Quote::error("TSLA", "operation timed out");
        let rendered = format_quote(&quote);
        assert!(rendered.contains("TSLA"));
        assert!(rendered.contains("unavailable"));
        assert!(rendered.contains("operation timed out"));
    }

    #[test]
    fn unavailable_metric_renders_as_dash_not_zero() {
        assert_eq!(format_metric(&Metric::Unavailable), "-");
        assert_eq!(format_metric(&Metric::Value(0.0)), "0");
    }

    #[test]
    fn ok_record_renders_all_fields() {
        let quote = Quote {
            symbol: "AAPL".to_string(),
            company_name: "Apple Inc.".to_string(),
            price: 227.52,
            change: 2.33,
            change_percent: 1.04,
            market_cap: Metric::Value(3.42e12),
            volume: Metric::Unavailable,
            observed_at: timestamp_ms(),
            status: QuoteStatus::Ok,
            error: None,
        };
        let rendered = format_quote(&quote);
        assert!(rendered.contains("AAPL"));
        assert!(rendered.contains("Apple Inc."));
        assert!(rendered.contains("price=227.52"));
        assert!(rendered.contains("(+1.04%)"));
        assert!(rendered.contains("vol=-"));
    }

    #[test]
    fn quoted_paths_are_normalized() {
        assert_eq!(normalize_path(" \"C:\\symbols.txt\" "), PathBuf::from("C:\\symbols.txt"));
        assert_eq!(normalize_path("./symbols.txt"), PathBuf::from("./symbols.txt"));
    }
}
