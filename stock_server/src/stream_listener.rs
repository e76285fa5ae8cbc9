//! TCP listener for push subscribers.
//!
//! Connecting to the stream port is subscribing: each accepted connection
//! gets its own hub subscription and a writer thread forwarding every
//! envelope as one JSON line. A write failure (client gone) or a hub
//! shutdown ends the thread and removes the subscription; the accept loop
//! itself keeps serving other clients regardless of individual failures.

use std::io::Write;
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;

use crossbeam_channel::Receiver;
use log::{error, info};
use stock_common::TrackerError;

use crate::model::hub::{BroadcastHub, StreamEvent};

/// Accepts subscriber connections and spawns a writer thread per client.
pub struct StreamListener {
    socket: TcpListener,
}

impl StreamListener {
    /// Bind the listener to the provided `bind_addr` (e.g., `0.0.0.0:8081`).
    pub fn new(bind_addr: &str) -> Result<Self, TrackerError> {
        let socket = TcpListener::bind(bind_addr)?;
        Ok(Self { socket })
    }

    /// Blocking accept loop. Each connection is handled on its own thread
    /// so one slow or broken subscriber never blocks the others.
    pub fn accept_loop(self, hub: Arc<BroadcastHub>) {
        match self.socket.local_addr() {
            Ok(addr) => info!("Stream TCP server is started on {}", addr),
            Err(e) => error!("Stream listener local_addr failed: {}", e),
        }

        for stream in self.socket.incoming() {
            match stream {
                Ok(stream) => {
                    let hub = Arc::clone(&hub);
                    thread::spawn(move || {
                        if let Err(e) = handle_subscriber(stream, hub) {
                            error!("Subscriber stream ended with error: {}", e);
                        }
                    });
                }
                Err(e) => error!("TCP connection error: {}", e),
            }
        }
    }
}

/// Subscribes the connection to the hub and forwards events until the
/// client disconnects or the hub shuts down. Always unsubscribes on exit.
fn handle_subscriber(mut stream: TcpStream, hub: Arc<BroadcastHub>) -> Result<(), TrackerError> {
    let peer = stream.peer_addr()?;
    let (id, events) = hub.subscribe()?;
    info!("Subscriber {} connected from {}", id, peer);

    let result = forward_events(&mut stream, &events);

    if let Err(e) = hub.unsubscribe(id) {
        error!("Failed to unsubscribe {}: {}", id, e);
    }
    info!("Subscriber {} ({}) disconnected", id, peer);
    result
}

/// Writes each envelope as one newline-terminated JSON object.
fn forward_events(
    stream: &mut TcpStream,
    events: &Receiver<StreamEvent>,
) -> Result<(), TrackerError> {
    for event in events.iter() {
        match event {
            StreamEvent::Data(envelope) => {
                let mut payload = envelope.to_json_bytes()?;
                payload.push(b'\n');
                stream.write_all(&payload)?;
            }
            StreamEvent::Shutdown => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::QuoteStore;
    use std::io::{BufRead, BufReader};
    use stock_common::envelope::{Envelope, EnvelopeKind};
    use stock_common::quote::Quote;

    #[test]
    fn subscriber_gets_snapshot_then_updates_over_tcp() {
        let store = Arc::new(QuoteStore::new());
        store
            .merge_tick(vec![Quote::error("AAPL", "seed")], &["AAPL".to_string()])
            .unwrap();
        let hub = Arc::new(BroadcastHub::new(Arc::clone(&store)));

        let listener = StreamListener::new("127.0.0.1:0").unwrap();
        let addr = listener.socket.local_addr().unwrap();
        {
            let hub = Arc::clone(&hub);
            thread::spawn(move || listener.accept_loop(hub));
        }

        let stream = TcpStream::connect(addr).unwrap();
        let mut reader = BufReader::new(stream);
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let snapshot: Envelope = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(snapshot.kind, EnvelopeKind::Snapshot);
        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].symbol, "AAPL");

        // The snapshot line proves the subscription is registered, so this
        // broadcast must reach the connection next.
        hub.broadcast_update(vec![Quote::error("MSFT", "tick")]).unwrap();
        line.clear();
        reader.read_line(&mut line).unwrap();
        let update: Envelope = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(update.kind, EnvelopeKind::Update);
        assert_eq!(update.records[0].symbol, "MSFT");
    }
}
