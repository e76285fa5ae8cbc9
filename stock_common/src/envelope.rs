//! Wire envelope for broadcast and snapshot payloads.
//!
//! Every payload pushed to a subscriber or returned by a snapshot query is a
//! single JSON object `{ kind, records }`. The `kind` tag lets a receiver
//! distinguish "this is everything the server has right now" (sent once when
//! a subscriber joins) from "these records changed in the last tick".

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::TrackerError;
use crate::quote::Quote;

/// Discriminates a full replay from an incremental update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EnvelopeKind {
    /// Full point-in-time copy of all current records.
    Snapshot,
    /// Only the records merged in the last tick.
    Update,
}

/// Batch of quotes tagged with its delivery semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Snapshot or incremental update.
    pub kind: EnvelopeKind,
    /// The quotes carried by this payload.
    pub records: Vec<Quote>,
}

impl Envelope {
    /// Wraps a full store copy for a newly joined subscriber.
    pub fn snapshot(records: Vec<Quote>) -> Self {
        Envelope {
            kind: EnvelopeKind::Snapshot,
            records,
        }
    }

    /// Wraps the records merged by one tick.
    pub fn update(records: Vec<Quote>) -> Self {
        Envelope {
            kind: EnvelopeKind::Update,
            records,
        }
    }

    /// Encode the envelope to JSON bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, TrackerError> {
        let json = serde_json::to_vec(self)?;
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_tags_are_lowercase() {
        let json = serde_json::to_string(&Envelope::snapshot(Vec::new())).unwrap();
        assert_eq!(json, r#"{"kind":"snapshot","records":[]}"#);
        let json = serde_json::to_string(&Envelope::update(Vec::new())).unwrap();
        assert_eq!(json, r#"{"kind":"update","records":[]}"#);
    }

    #[test]
    fn envelope_round_trips_with_records() {
        let envelope = Envelope::update(vec![Quote::error("NVDA", "no route to host")]);
        let bytes = envelope.to_json_bytes().unwrap();
        let decoded: Envelope = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded.kind, EnvelopeKind::Update);
        assert_eq!(decoded.records.len(), 1);
        assert_eq!(decoded.records[0].symbol, "NVDA");
    }
}
