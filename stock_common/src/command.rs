//! Shared control-channel command type used by client and server.
//!
//! A `Command` is a single JSON object sent over the command TCP port. It is
//! either a `SNAPSHOT` query (the server answers with one snapshot envelope
//! and closes the connection) or a `SET_SYMBOLS` request replacing the
//! tracked symbol list, which the next scheduled tick picks up.
use serde::{Deserialize, Serialize};

/// Header value for one-shot snapshot queries.
pub const SNAPSHOT: &str = "SNAPSHOT";
/// Header value for symbol-list replacement requests.
pub const SET_SYMBOLS: &str = "SET_SYMBOLS";

/// Command payload sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    /// Command kind. Either `SNAPSHOT` or `SET_SYMBOLS`.
    pub header: String,
    /// New symbol list (empty for `SNAPSHOT`).
    #[serde(default)]
    pub symbols: Vec<String>,
}

impl Command {
    /// Creates a new `SNAPSHOT` query command.
    pub fn snapshot() -> Self {
        Command {
            header: String::from(SNAPSHOT),
            symbols: Vec::new(),
        }
    }

    /// Creates a new `SET_SYMBOLS` command carrying the replacement list.
    pub fn set_symbols(symbols: Vec<String>) -> Self {
        Command {
            header: String::from(SET_SYMBOLS),
            symbols,
        }
    }

    /// Encode the command to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, crate::TrackerError> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }
}
