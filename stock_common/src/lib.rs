//!
//! Common types and utilities shared by the stock tracker server and client.
//!
//! This crate aggregates:
//! - `error` — unified error type `TrackerError` used across the workspace.
//! - `result` — handy `Result<T, TrackerError>` alias.
//! - `quote` — the canonical per-symbol quote record and its field types.
//! - `envelope` — wire envelope tagging snapshot vs. incremental payloads.
//! - `symbols` — symbol normalization and symbols-file parsing helpers.
//! - `command` — control-channel payloads exchanged between client and server.
//! - `net` — networking constants and small helpers.
#![warn(missing_docs)]
pub mod command;
pub mod envelope;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod symbols;

pub use command::Command;
pub use envelope::{Envelope, EnvelopeKind};
pub use error::TrackerError;
pub use quote::{Metric, Quote, QuoteStatus};
pub use result::Result;
