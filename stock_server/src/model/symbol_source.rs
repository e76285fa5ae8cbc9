//! Tracked symbol list backed by a text file.
//!
//! The file is the source of truth: the scheduler re-reads it on every tick
//! (so a `SET_SYMBOLS` command takes effect on the next cycle), and the
//! command receiver rewrites it on replacement requests. A missing or
//! unreadable file is absorbed locally by falling back to the default
//! list; configuration failure never surfaces past this module.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use log::warn;
use stock_common::TrackerError;
use stock_common::symbols::{default_symbols, normalize_symbols, parse_from_reader};

/// Symbol list read from (and written to) a symbols file.
#[derive(Clone)]
pub struct SymbolSource {
    path: PathBuf,
}

impl SymbolSource {
    /// Creates a source backed by the given file path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the current symbol list, falling back to the defaults when the
    /// file is missing, unreadable, or empty.
    pub fn load(&self) -> Vec<String> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) => {
                warn!(
                    "Cannot read symbols file {}: {}; using default symbols",
                    self.path.display(),
                    e
                );
                return default_symbols();
            }
        };

        match parse_from_reader(BufReader::new(file)) {
            Ok(symbols) if !symbols.is_empty() => symbols,
            Ok(_) => {
                warn!(
                    "Symbols file {} is empty; using default symbols",
                    self.path.display()
                );
                default_symbols()
            }
            Err(e) => {
                warn!(
                    "Cannot parse symbols file {}: {}; using default symbols",
                    self.path.display(),
                    e
                );
                default_symbols()
            }
        }
    }

    /// Normalizes and persists a replacement list, one symbol per line.
    /// The next tick picks it up. Returns the list as stored.
    pub fn store(&self, raw: &[String]) -> Result<Vec<String>, TrackerError> {
        let symbols = normalize_symbols(raw);
        let mut contents = symbols.join("\n");
        contents.push('\n');
        fs::write(&self.path, contents)?;
        Ok(symbols)
    }
}
