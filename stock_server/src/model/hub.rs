//! Subscriber registry and quote fan-out.
//!
//! The hub owns the set of active subscriber channels. A new subscriber
//! immediately receives a full snapshot envelope built from the store, so a
//! late joiner sees everything before the first incremental update. Each
//! tick's update is then pushed to every registered channel in emission
//! order; per-subscriber channels are FIFO, so a given subscriber observes
//! ticks exactly as the scheduler emitted them.
//!
//! Broadcast is best-effort across subscribers: if sending to one fails
//! (its receiver is gone), only that subscriber is removed and delivery to
//! the others continues.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::info;
use stock_common::TrackerError;
use stock_common::envelope::Envelope;
use stock_common::quote::Quote;

use crate::model::store::QuoteStore;

/// Identifier handed out per subscription; used to unsubscribe.
pub type SubscriberId = u64;

/// Message sent by the hub to its subscribers.
#[derive(Clone)]
pub enum StreamEvent {
    /// A snapshot or update envelope to forward to the sink.
    Data(Envelope),
    /// Global shutdown notification for all consumers.
    Shutdown,
}

/// Fan-out hub over an open set of subscriber channels.
pub struct BroadcastHub {
    store: Arc<QuoteStore>,
    subscribers: Mutex<HashMap<SubscriberId, Sender<StreamEvent>>>,
    next_id: AtomicU64,
}

impl BroadcastHub {
    /// Creates a hub reading snapshots from `store`.
    pub fn new(store: Arc<QuoteStore>) -> Self {
        Self {
            store,
            subscribers: Mutex::new(HashMap::new()),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers a new subscriber and queues its initial snapshot.
    ///
    /// The snapshot event is placed on the channel before the subscriber is
    /// visible to `broadcast_update`, so the first event a subscriber reads
    /// is always the full replay, followed by updates in tick order.
    pub fn subscribe(&self) -> Result<(SubscriberId, Receiver<StreamEvent>), TrackerError> {
        let (tx, rx) = unbounded::<StreamEvent>();
        let snapshot = self.store.snapshot()?;
        tx.send(StreamEvent::Data(Envelope::snapshot(snapshot)))
            .map_err(|e| TrackerError::ChannelSend(e.to_string()))?;

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.subscribers.lock()?.insert(id, tx);
        info!("Subscriber {} registered ({} total)", id, self.subscriber_count());
        Ok((id, rx))
    }

    /// Removes a subscriber; idempotent.
    pub fn unsubscribe(&self, id: SubscriberId) -> Result<(), TrackerError> {
        if self.subscribers.lock()?.remove(&id).is_some() {
            info!("Subscriber {} removed", id);
        }
        Ok(())
    }

    /// Pushes the records merged by one tick to every subscriber.
    ///
    /// Subscribers whose channel is gone are dropped from the set; nobody
    /// else is affected.
    pub fn broadcast_update(&self, records: Vec<Quote>) -> Result<(), TrackerError> {
        let event = StreamEvent::Data(Envelope::update(records));
        let mut subscribers = self.subscribers.lock()?;
        subscribers.retain(|id, tx| {
            let delivered = tx.send(event.clone()).is_ok();
            if !delivered {
                info!("Subscriber {} gone, removing", id);
            }
            delivered
        });
        Ok(())
    }

    /// Notifies all subscribers to terminate and clears the set.
    pub fn shutdown(&self) -> Result<(), TrackerError> {
        let mut subscribers = self.subscribers.lock()?;
        for (_, tx) in subscribers.drain() {
            let _ = tx.send(StreamEvent::Shutdown);
        }
        Ok(())
    }

    /// Number of currently registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|s| s.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stock_common::envelope::EnvelopeKind;

    fn hub_with_store(records: Vec<Quote>) -> BroadcastHub {
        let store = Arc::new(QuoteStore::new());
        let tracked: Vec<String> = records.iter().map(|q| q.symbol.clone()).collect();
        store.merge_tick(records, &tracked).unwrap();
        BroadcastHub::new(store)
    }

    fn expect_data(event: StreamEvent) -> Envelope {
        match event {
            StreamEvent::Data(envelope) => envelope,
            StreamEvent::Shutdown => panic!("unexpected shutdown event"),
        }
    }

    #[test]
    fn late_joiner_gets_snapshot_before_updates() {
        let hub = hub_with_store(vec![Quote::error("AAPL", "seed")]);
        let (_id, rx) = hub.subscribe().unwrap();
        hub.broadcast_update(vec![Quote::error("MSFT", "tick 1")])
            .unwrap();

        let first = expect_data(rx.recv().unwrap());
        assert_eq!(first.kind, EnvelopeKind::Snapshot);
        assert_eq!(first.records.len(), 1);
        assert_eq!(first.records[0].symbol, "AAPL");

        let second = expect_data(rx.recv().unwrap());
        assert_eq!(second.kind, EnvelopeKind::Update);
        assert_eq!(second.records[0].symbol, "MSFT");
    }

    #[test]
    fn updates_arrive_in_tick_order() {
        let hub = hub_with_store(Vec::new());
        let (_id, rx) = hub.subscribe().unwrap();
        hub.broadcast_update(vec![Quote::error("A", "tick 1")]).unwrap();
        hub.broadcast_update(vec![Quote::error("B", "tick 2")]).unwrap();

        let _snapshot = expect_data(rx.recv().unwrap());
        assert_eq!(expect_data(rx.recv().unwrap()).records[0].symbol, "A");
        assert_eq!(expect_data(rx.recv().unwrap()).records[0].symbol, "B");
    }

    #[test]
    fn dead_subscriber_does_not_stop_delivery_to_others() {
        let hub = hub_with_store(Vec::new());
        let (_gone_id, gone_rx) = hub.subscribe().unwrap();
        let (_live_id, live_rx) = hub.subscribe().unwrap();
        drop(gone_rx);

        hub.broadcast_update(vec![Quote::error("TSLA", "tick")]).unwrap();

        let _snapshot = expect_data(live_rx.recv().unwrap());
        let update = expect_data(live_rx.recv().unwrap());
        assert_eq!(update.records[0].symbol, "TSLA");
        assert_eq!(hub.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let hub = hub_with_store(Vec::new());
        let (id, _rx) = hub.subscribe().unwrap();
        hub.unsubscribe(id).unwrap();
        hub.unsubscribe(id).unwrap();
        assert_eq!(hub.subscriber_count(), 0);
    }

    #[test]
    fn shutdown_reaches_every_subscriber() {
        let hub = hub_with_store(Vec::new());
        let (_a, rx_a) = hub.subscribe().unwrap();
        let (_b, rx_b) = hub.subscribe().unwrap();
        hub.shutdown().unwrap();

        for rx in [rx_a, rx_b] {
            let _snapshot = expect_data(rx.recv().unwrap());
            assert!(matches!(rx.recv().unwrap(), StreamEvent::Shutdown));
        }
        assert_eq!(hub.subscriber_count(), 0);
    }
}
