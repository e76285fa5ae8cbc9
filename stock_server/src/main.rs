//! Stock tracker server.
//!
//! This binary periodically scrapes per-symbol quote data from Yahoo
//! Finance, normalizes it into canonical records, keeps the latest record
//! per symbol in memory, and streams updates to any number of TCP
//! subscribers. Internally, it wires together the main building blocks:
//!
//! - `Scheduler` — runs the fetch-merge-broadcast cycle on a fixed
//!   interval; each tick fans out one fetch worker per configured symbol,
//!   joins on all of them, and merges the settled records.
//! - `QuoteStore` — the single in-memory table of symbol -> latest quote,
//!   written only by the scheduler and read by snapshot queries.
//! - `BroadcastHub` — the set of subscriber channels; new subscribers get a
//!   full snapshot replay, then incremental updates in tick order.
//! - `StreamListener` — accepts TCP subscribers on the stream port and
//!   forwards envelopes as newline-delimited JSON.
//! - `CommandReceiver` — serves one-shot `SNAPSHOT` queries and
//!   `SET_SYMBOLS` configuration changes on the command port.
//!
//! Concurrency and shutdown:
//! - Crossbeam `select!` multiplexes the tick timer and the shutdown signal
//!   in the scheduler; fetch workers are plain threads joined per tick.
//! - Ctrl+C triggers the shutdown channel; the scheduler stops, the hub
//!   broadcasts a shutdown event, and subscriber threads exit gracefully.
//! - Any per-client I/O or parse error is logged and recovered; a single
//!   client can never stop the pipeline or the other subscribers.
//!
//! Network protocol (high-level):
//! - Command port (default 8080): one JSON `Command` per TCP connection.
//! - Stream port (default 8081): connect to subscribe; the server pushes
//!   `{ kind: "snapshot" | "update", records: [...] }` JSON lines.
#![warn(missing_docs)]
use crate::args::Args;
use crate::model::fetch::{QuoteFetcher, YahooFetcher};
use crate::model::hub::BroadcastHub;
use crate::model::scheduler::Scheduler;
use crate::model::store::QuoteStore;
use crate::model::symbol_source::SymbolSource;
use crate::receiver::CommandReceiver;
use crate::stream_listener::StreamListener;
use clap::Parser;
use crossbeam_channel::unbounded;
use log::{error, info};
use stock_common::net::addr;
use stock_common::Result;
use stock_common::TrackerError;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod args;
pub mod model;
mod receiver;
mod stream_listener;

fn main() -> Result<(), TrackerError> {
    init_logger();
    let args = Args::parse();

    let store = Arc::new(QuoteStore::new());
    let hub = Arc::new(BroadcastHub::new(Arc::clone(&store)));
    let symbols = SymbolSource::new(&args.symbols_file);

    let (shutdown_tx, shutdown_rx) = unbounded::<()>();
    ctrlc::set_handler(move || {
        info!("Ctrl+C received. Shutting down server...");
        let _ = shutdown_tx.send(());
    })
    .map_err(|e| TrackerError::Format(format!("Error setting Ctrl+C handler: {e}")))?;

    let stream_listener = StreamListener::new(&addr("0.0.0.0", args.stream_port))?;
    {
        let hub = Arc::clone(&hub);
        thread::spawn(move || stream_listener.accept_loop(hub));
    }

    let command_receiver = CommandReceiver::new(&addr("0.0.0.0", args.command_port))?;
    {
        let store = Arc::clone(&store);
        let symbols = symbols.clone();
        thread::spawn(move || {
            if let Err(e) = command_receiver.receive_loop(store, symbols) {
                error!("Receiver loop failed: {:?}", e);
            }
        });
    }

    let fetcher: Arc<dyn QuoteFetcher> = Arc::new(YahooFetcher::new()?);
    let scheduler = Scheduler::new(
        fetcher,
        symbols,
        store,
        Arc::clone(&hub),
        Duration::from_secs(args.interval_secs),
    );
    scheduler.run(shutdown_rx);

    hub.shutdown()?;
    info!("Server stopped");
    Ok(())
}

fn init_logger() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
}
