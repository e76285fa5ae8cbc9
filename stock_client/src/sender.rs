//! Sending commands to the tracker server over TCP.
//!
//! This module provides a small helper for encoding and sending `Command`
//! messages: one connection per command, JSON payload, and for snapshot
//! queries a single envelope read back before the server closes the
//! connection.
use std::io::{BufRead, BufReader, Write};
use std::net::TcpStream;

use log::info;
use stock_common::envelope::Envelope;
use stock_common::{Command, TrackerError};

/// Helper type for sending commands to the server.
pub struct CommandSender;

impl CommandSender {
    /// Sends one command to `server_addr` and returns the open stream for
    /// callers that expect a reply.
    fn send(server_addr: &str, command: &Command) -> Result<TcpStream, TrackerError> {
        let mut stream = TcpStream::connect(server_addr)
            .map_err(|e| TrackerError::Format(format!("Failed to connect to server: {e}")))?;
        info!("Sending {} command to {}", command.header, server_addr);
        stream.write_all(&command.to_json_bytes()?)?;
        stream.flush()?;
        Ok(stream)
    }

    /// Pushes a replacement symbol list; takes effect on the next tick.
    pub fn set_symbols(server_addr: &str, symbols: Vec<String>) -> Result<(), TrackerError> {
        Self::send(server_addr, &Command::set_symbols(symbols))?;
        Ok(())
    }

    /// Queries one full snapshot of the server's current records.
    pub fn request_snapshot(server_addr: &str) -> Result<Envelope, TrackerError> {
        let stream = Self::send(server_addr, &Command::snapshot())?;
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let envelope: Envelope = serde_json::from_str(line.trim_end())?;
        Ok(envelope)
    }
}
