//! Periodic fetch-merge-broadcast cycle.
//!
//! The scheduler is the single driver of the pipeline. Each tick it reads
//! the current symbol list, fans out one fetch worker per symbol, joins on
//! all of them (the only fork/join point), merges the settled records into
//! the store as its sole writer, and hands exactly those records to the
//! broadcast hub.
//!
//! Re-entrancy: ticks run inline on the scheduler thread and the timer is a
//! capacity-one tick channel, so a slow tick coalesces at most one pending
//! timer event and two ticks can never merge concurrently.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, select, tick, unbounded};
use log::{error, info, warn};
use stock_common::quote::Quote;

use crate::model::fetch::QuoteFetcher;
use crate::model::hub::BroadcastHub;
use crate::model::store::QuoteStore;
use crate::model::symbol_source::SymbolSource;

/// Timer-driven coordinator of the fetch pipeline.
pub struct Scheduler {
    fetcher: Arc<dyn QuoteFetcher>,
    symbols: SymbolSource,
    store: Arc<QuoteStore>,
    hub: Arc<BroadcastHub>,
    interval: Duration,
}

impl Scheduler {
    /// Wires a scheduler over its collaborators.
    pub fn new(
        fetcher: Arc<dyn QuoteFetcher>,
        symbols: SymbolSource,
        store: Arc<QuoteStore>,
        hub: Arc<BroadcastHub>,
        interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            symbols,
            store,
            hub,
            interval,
        }
    }

    /// Runs one immediate tick, then keeps ticking on the interval until a
    /// shutdown signal arrives. This call blocks the current thread.
    pub fn run(&self, shutdown_rx: Receiver<()>) {
        self.run_tick();
        let timer = tick(self.interval);
        loop {
            select! {
                recv(timer) -> _ => self.run_tick(),
                recv(shutdown_rx) -> _ => {
                    info!("Scheduler stopping");
                    break;
                }
            }
        }
    }

    /// One full cycle: concurrent fetch of all symbols, merge, broadcast.
    ///
    /// Individual fetch failures arrive as `status=error` records and are
    /// merged and broadcast like any other update; nothing a single symbol
    /// does can abort the tick.
    pub fn run_tick(&self) {
        let symbols = self.symbols.load();
        info!("Tick started for {} symbols", symbols.len());

        let (result_tx, result_rx) = unbounded::<Quote>();
        let mut workers = Vec::with_capacity(symbols.len());
        for symbol in &symbols {
            let fetcher = Arc::clone(&self.fetcher);
            let result_tx = result_tx.clone();
            let symbol = symbol.clone();
            workers.push(thread::spawn(move || {
                let _ = result_tx.send(fetcher.fetch(&symbol));
            }));
        }
        drop(result_tx);

        // The tick is complete only when every worker has settled; partial
        // results are never merged or broadcast early.
        let mut records: Vec<Quote> = result_rx.iter().collect();
        for (symbol, worker) in symbols.iter().zip(workers) {
            if worker.join().is_err() {
                warn!("Fetch worker for {} panicked", symbol);
                records.push(Quote::error(symbol, "fetch worker panicked"));
            }
        }

        if let Err(e) = self.store.merge_tick(records.clone(), &symbols) {
            error!("Tick merge failed: {}", e);
            return;
        }
        let updated = records.len();
        if let Err(e) = self.hub.broadcast_update(records) {
            error!("Tick broadcast failed: {}", e);
        }
        info!("Tick finished: {} symbols updated", updated);
    }
}
