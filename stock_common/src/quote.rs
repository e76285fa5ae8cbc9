//! Canonical quote model shared by server and client.
//!
//! A `Quote` is the unit exchanged across every interface: the scheduler
//! stores exactly one per tracked symbol, snapshot queries return copies of
//! them, and the broadcast hub pushes them to subscribers inside envelopes.
//! Field names are camelCased on the wire.
//!
//! Two field families behave differently when the source data is missing:
//! - `price`/`change`/`change_percent` default to `0.0`,
//! - `market_cap`/`volume` carry an explicit [`Metric::Unavailable`] marker,
//!   serialized as the string `"N/A"`, which downstream display must not
//!   confuse with a genuine zero.

use std::fmt;

use chrono::Utc;
use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Wire marker for a metric the source did not provide.
pub const UNAVAILABLE: &str = "N/A";

/// A numeric market metric that may be genuinely absent in the source data.
///
/// `Unavailable` is distinct from `Value(0.0)`: a stock can trade with zero
/// volume, while an index has no market cap at all.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Metric {
    /// The metric was present and parsed to a finite number.
    Value(f64),
    /// The source did not provide this metric.
    Unavailable,
}

impl Metric {
    /// Returns `true` if the metric carries no value.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Metric::Unavailable)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::Value(v) => write!(f, "{v}"),
            Metric::Unavailable => write!(f, "{UNAVAILABLE}"),
        }
    }
}

impl Serialize for Metric {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Metric::Value(v) => serializer.serialize_f64(*v),
            Metric::Unavailable => serializer.serialize_str(UNAVAILABLE),
        }
    }
}

impl<'de> Deserialize<'de> for Metric {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Num(f64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Num(v) => Metric::Value(v),
            Raw::Text(_) => Metric::Unavailable,
        })
    }
}

/// Outcome of the fetch that produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum QuoteStatus {
    /// The quote page was fetched and normalized.
    Ok,
    /// The fetch failed; all numeric fields are defaulted and `error`
    /// carries a diagnostic.
    Error,
}

/// Canonical per-symbol quote record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    /// Uppercase symbol, the unique key within the store.
    pub symbol: String,
    /// Display name; falls back to the symbol when unresolved.
    pub company_name: String,
    /// Last traded price. `0.0` when unparseable.
    pub price: f64,
    /// Absolute price change. `0.0` when unparseable.
    pub change: f64,
    /// Relative price change in percent. `0.0` when unparseable.
    pub change_percent: f64,
    /// Market capitalization, or unavailable.
    pub market_cap: Metric,
    /// Trading volume, or unavailable.
    pub volume: Metric,
    /// Time of this fetch (not of the market event), ms since the UNIX epoch.
    pub observed_at: u64,
    /// Whether the fetch succeeded.
    pub status: QuoteStatus,
    /// Diagnostic message, present iff `status` is [`QuoteStatus::Error`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Quote {
    /// Builds the defaulted error record for a symbol whose fetch failed.
    ///
    /// Error records are regular store members and are broadcast like any
    /// other update; consumers render them as an unavailable state.
    pub fn error(symbol: &str, diagnostic: &str) -> Self {
        Quote {
            symbol: symbol.to_string(),
            company_name: symbol.to_string(),
            price: 0.0,
            change: 0.0,
            change_percent: 0.0,
            market_cap: Metric::Unavailable,
            volume: Metric::Unavailable,
            observed_at: timestamp_ms(),
            status: QuoteStatus::Error,
            error: Some(diagnostic.to_string()),
        }
    }
}

/// Current UTC time in milliseconds since the UNIX epoch.
pub fn timestamp_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}
