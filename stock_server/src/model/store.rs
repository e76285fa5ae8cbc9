//! In-memory table of symbol -> latest quote.
//!
//! The store has exactly one writer: the scheduler's merge step. Snapshot
//! queries and the broadcast hub read it concurrently. A tick's merge and
//! the pruning of untracked symbols happen under a single write lock, so a
//! reader either sees the store before the tick or after it, never in
//! between. The lock is only ever held to copy or replace data, never
//! across a network call.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use stock_common::TrackerError;
use stock_common::quote::Quote;

/// Single-writer, multi-reader quote table.
#[derive(Default)]
pub struct QuoteStore {
    quotes: RwLock<HashMap<String, Quote>>,
}

impl QuoteStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one tick: wholesale-replaces the entry for every settled
    /// record and evicts symbols that are no longer tracked.
    ///
    /// Eviction policy: the store mirrors the tracked set after each tick,
    /// so shrinking the configuration prunes stale entries immediately.
    pub fn merge_tick(&self, records: Vec<Quote>, tracked: &[String]) -> Result<(), TrackerError> {
        let tracked: HashSet<&str> = tracked.iter().map(String::as_str).collect();
        let mut quotes = self.quotes.write()?;
        for record in records {
            quotes.insert(record.symbol.clone(), record);
        }
        quotes.retain(|symbol, _| tracked.contains(symbol.as_str()));
        Ok(())
    }

    /// Point-in-time copy of all current records, sorted by symbol.
    pub fn snapshot(&self) -> Result<Vec<Quote>, TrackerError> {
        let quotes = self.quotes.read()?;
        let mut all: Vec<Quote> = quotes.values().cloned().collect();
        all.sort_by(|a, b| a.symbol.cmp(&b.symbol));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use stock_common::quote::{Metric, QuoteStatus, timestamp_ms};

    fn quote(symbol: &str, price: f64) -> Quote {
        Quote {
            symbol: symbol.to_string(),
            company_name: symbol.to_string(),
            price,
            change: 0.5,
            change_percent: 0.25,
            market_cap: Metric::Value(1e9),
            volume: Metric::Value(1000.0),
            observed_at: timestamp_ms(),
            status: QuoteStatus::Ok,
            error: None,
        }
    }

    fn tracked(symbols: &[&str]) -> Vec<String> {
        symbols.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn one_record_per_symbol_after_merge() {
        let store = QuoteStore::new();
        let symbols = tracked(&["AAPL", "MSFT"]);
        store
            .merge_tick(vec![quote("AAPL", 1.0), quote("MSFT", 2.0)], &symbols)
            .unwrap();
        store
            .merge_tick(vec![quote("AAPL", 3.0), quote("MSFT", 4.0)], &symbols)
            .unwrap();

        let all = store.snapshot().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].symbol, "AAPL");
        assert_eq!(all[0].price, 3.0);
        assert_eq!(all[1].symbol, "MSFT");
        assert_eq!(all[1].price, 4.0);
    }

    #[test]
    fn records_are_replaced_wholesale() {
        let store = QuoteStore::new();
        let symbols = tracked(&["TSLA"]);
        store.merge_tick(vec![quote("TSLA", 250.0)], &symbols).unwrap();
        // Second tick fails for the symbol: the error record replaces every
        // field, no partial merge of the old numeric values.
        store
            .merge_tick(vec![Quote::error("TSLA", "timeout")], &symbols)
            .unwrap();

        let all = store.snapshot().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].status, QuoteStatus::Error);
        assert_eq!(all[0].price, 0.0);
        assert!(all[0].market_cap.is_unavailable());
    }

    #[test]
    fn identical_merges_are_idempotent_modulo_timestamp() {
        let store = QuoteStore::new();
        let symbols = tracked(&["NVDA"]);
        store.merge_tick(vec![quote("NVDA", 9.0)], &symbols).unwrap();
        let first = store.snapshot().unwrap();
        store.merge_tick(vec![quote("NVDA", 9.0)], &symbols).unwrap();
        let second = store.snapshot().unwrap();

        let mut first = first.into_iter().next().unwrap();
        let mut second = second.into_iter().next().unwrap();
        first.observed_at = 0;
        second.observed_at = 0;
        assert_eq!(first, second);
    }

    #[test]
    fn untracked_symbols_are_pruned() {
        let store = QuoteStore::new();
        store
            .merge_tick(
                vec![quote("AAPL", 1.0), quote("MSFT", 2.0)],
                &tracked(&["AAPL", "MSFT"]),
            )
            .unwrap();
        store
            .merge_tick(vec![quote("AAPL", 1.5)], &tracked(&["AAPL"]))
            .unwrap();

        let all = store.snapshot().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].symbol, "AAPL");
    }

    #[test]
    fn snapshots_never_observe_a_partial_merge() {
        let store = Arc::new(QuoteStore::new());
        let symbols = tracked(&["AAPL", "MSFT", "TSLA"]);
        store
            .merge_tick(
                vec![quote("AAPL", 1.0), quote("MSFT", 1.0), quote("TSLA", 1.0)],
                &symbols,
            )
            .unwrap();

        let writer = {
            let store = Arc::clone(&store);
            let symbols = symbols.clone();
            thread::spawn(move || {
                for i in 0..500 {
                    let price = i as f64;
                    store
                        .merge_tick(
                            vec![
                                quote("AAPL", price),
                                quote("MSFT", price),
                                quote("TSLA", price),
                            ],
                            &symbols,
                        )
                        .unwrap();
                }
            })
        };

        for _ in 0..500 {
            let all = store.snapshot().unwrap();
            // Always the full tracked set, no missing or duplicated keys.
            assert_eq!(all.len(), 3);
            let symbols: Vec<&str> = all.iter().map(|q| q.symbol.as_str()).collect();
            assert_eq!(symbols, vec!["AAPL", "MSFT", "TSLA"]);
        }
        writer.join().unwrap();
    }
}
