use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use uuid::Uuid;

pub type ConnectionId = Uuid;

/// Registry of open chat connections.
///
/// Each connection is represented by the sending half of an unbounded
/// queue that its socket writer task drains. Registration, removal and
/// relay all happen under one mutex, so a relay never sees a connection
/// mid-insert or one that has already left.
#[derive(Clone)]
pub struct ChatHub {
    peers: Arc<Mutex<HashMap<ConnectionId, mpsc::UnboundedSender<String>>>>,
    echo_to_sender: bool,
}

impl ChatHub {
    pub fn new(echo_to_sender: bool) -> Self {
        Self {
            peers: Arc::new(Mutex::new(HashMap::new())),
            echo_to_sender,
        }
    }

    /// Register a new connection. The receiver yields every message relayed
    /// to it until the connection leaves.
    pub fn join(&self) -> (ConnectionId, mpsc::UnboundedReceiver<String>) {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::unbounded_channel();
        let mut peers = self.peers();
        peers.insert(id, tx);
        tracing::debug!(connection = %id, peers = peers.len(), "chat connection opened");
        (id, rx)
    }

    /// Remove a connection. Returns false if it was already gone.
    pub fn leave(&self, id: ConnectionId) -> bool {
        let mut peers = self.peers();
        let removed = peers.remove(&id).is_some();
        tracing::debug!(connection = %id, peers = peers.len(), "chat connection closed");
        removed
    }

    /// Relay a message sent by `from` to every connection, including `from`
    /// itself only when echo is enabled. Returns how many peers it reached.
    pub fn relay(&self, from: ConnectionId, message: &str) -> usize {
        self.send_where(message, |id| self.echo_to_sender || id != from)
    }

    /// Send a server notice to every connection.
    pub fn announce(&self, message: &str) -> usize {
        self.send_where(message, |_| true)
    }

    pub fn len(&self) -> usize {
        self.peers().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn send_where(&self, message: &str, include: impl Fn(ConnectionId) -> bool) -> usize {
        let mut peers = self.peers();
        let mut delivered = 0;
        // A failed send means the writer task is gone; drop that peer.
        peers.retain(|&id, tx| {
            if !include(id) {
                return true;
            }
            match tx.send(message.to_string()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    tracing::debug!(connection = %id, "pruning dead chat connection");
                    false
                }
            }
        });
        delivered
    }

    fn peers(&self) -> MutexGuard<'_, HashMap<ConnectionId, mpsc::UnboundedSender<String>>> {
        // The map stays consistent even if a holder panicked.
        self.peers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ---------------------------------------------------------------------------
// RelayMode
// ---------------------------------------------------------------------------

/// How a connection's messages are presented to its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMode {
    /// Prefix with the client number and announce departure.
    Announced { client_id: i64 },
    /// Relay the text unchanged; leave silently.
    Raw,
}

impl RelayMode {
    pub fn format(&self, text: &str) -> String {
        match self {
            RelayMode::Announced { client_id } => format!("Client #{client_id}: {text}"),
            RelayMode::Raw => text.to_string(),
        }
    }

    pub fn departure(&self) -> Option<String> {
        match self {
            RelayMode::Announced { client_id } => Some(format!("Client #{client_id} left the chat")),
            RelayMode::Raw => None,
        }
    }
}
