//! Core pipeline components of the stock tracker server.
//!
//! This module groups the building blocks wired together by `main`:
//! - `scrape` — tolerant extraction of quote fields from a fetched document.
//! - `fetch` — per-symbol retrieval with timeout, never failing past its boundary.
//! - `store` — the single in-memory table of symbol -> latest quote.
//! - `hub` — subscriber registry and snapshot/update fan-out.
//! - `scheduler` — the periodic fetch-merge-broadcast cycle.
//! - `symbol_source` — the tracked symbol list backed by a text file.

pub mod fetch;
pub mod hub;
pub mod scheduler;
pub mod scrape;
pub mod store;
pub mod symbol_source;
