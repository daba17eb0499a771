use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

/// Registry of live WS connections: conn_id -> outbound message queue.
///
/// Mutated only on connection open/close; iterated read-only during
/// broadcast. This is the sole state shared across connections.
pub struct ConnectionRegistry {
    conns: DashMap<String, mpsc::Sender<String>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
        }
    }

    pub fn add(&self, conn_id: String, tx: mpsc::Sender<String>) {
        self.conns.insert(conn_id, tx);
    }

    pub fn remove(&self, conn_id: &str) {
        self.conns.remove(conn_id);
    }

    pub fn len(&self) -> usize {
        self.conns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conns.is_empty()
    }

    /// Push a payload to every live connection. A full or closed queue
    /// drops the payload for that connection only.
    pub fn broadcast(&self, payload: &str) {
        for entry in self.conns.iter() {
            if entry.value().try_send(payload.to_string()).is_err() {
                debug!(conn_id = %entry.key(), "dropping broadcast for saturated connection");
            }
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
