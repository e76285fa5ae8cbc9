//! TCP command receiver for snapshot queries and configuration changes.
//!
//! Creates a listening socket and parses one JSON `Command` per incoming
//! connection. `SNAPSHOT` is answered with a single snapshot envelope;
//! `SET_SYMBOLS` rewrites the symbols file for the next tick. Errors in the
//! handling of one client's command are logged and never terminate the
//! accept loop, so a malformed request cannot take the server down.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;

use log::{error, info};
use stock_common::command::{self, Command};
use stock_common::envelope::Envelope;
use stock_common::TrackerError;

use crate::model::store::QuoteStore;
use crate::model::symbol_source::SymbolSource;

/// Command receiver accepting client requests over TCP.
pub struct CommandReceiver {
    socket: TcpListener,
}

impl CommandReceiver {
    /// Bind a new receiver to the provided `bind_addr` (e.g., `0.0.0.0:8080`).
    pub fn new(bind_addr: &str) -> Result<Self, TrackerError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Blocking loop that accepts TCP connections and serves one command
    /// per connection.
    pub fn receive_loop(
        self,
        store: Arc<QuoteStore>,
        symbols: SymbolSource,
    ) -> Result<(), TrackerError> {
        info!(
            "Command TCP server is started on {}",
            self.socket.local_addr()?
        );

        for stream in self.socket.incoming() {
            match stream {
                Ok(mut stream) => {
                    if let Err(e) = handle_command(&mut stream, &store, &symbols) {
                        error!("Command handling failed: {}", e);
                    }
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
        Ok(())
    }
}

/// Reads, decodes, and executes a single command.
fn handle_command(
    stream: &mut TcpStream,
    store: &QuoteStore,
    symbols: &SymbolSource,
) -> Result<(), TrackerError> {
    let peer = stream.peer_addr()?;
    let mut buf = [0u8; 4096];
    let size = stream.read(&mut buf)?;
    let cmd: Command = serde_json::from_slice(&buf[..size])?;
    info!("Received command {:?} from {}", cmd, peer);

    match cmd.header.as_str() {
        command::SNAPSHOT => {
            let envelope = Envelope::snapshot(store.snapshot()?);
            let mut payload = envelope.to_json_bytes()?;
            payload.push(b'\n');
            stream.write_all(&payload)?;
        }
        command::SET_SYMBOLS => {
            let stored = symbols.store(&cmd.symbols)?;
            info!("Symbol list replaced: {:?}", stored);
        }
        other => {
            return Err(TrackerError::Format(format!(
                "Unknown command header: {other}"
            )));
        }
    }
    Ok(())
}
