use dashmap::DashMap;
use flare_core::{PeerId, ServerMessage};
use tokio::sync::mpsc;
use tracing::{error, warn};

/// Live connections, keyed by the identity minted when the socket opened.
///
/// Each entry holds the outbound channel of one connection; pushing into it
/// is fire-and-forget, the websocket layer drains it into the wire.
pub struct ConnectionRegistry {
    peers: DashMap<PeerId, mpsc::UnboundedSender<ServerMessage>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            peers: DashMap::new(),
        }
    }

    pub fn register(&self, peer_id: PeerId, tx: mpsc::UnboundedSender<ServerMessage>) {
        self.peers.insert(peer_id, tx);
    }

    /// Returns whether the peer was still registered. Disconnect cleanup
    /// runs only on `true`, so a duplicate close event is a no-op.
    pub fn unregister(&self, peer_id: &PeerId) -> bool {
        self.peers.remove(peer_id).is_some()
    }

    pub fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.peers.contains_key(peer_id)
    }

    /// Push a message to one connection. An unknown or just-closed target
    /// drops the message; routing errors never travel back to the sender.
    pub fn send(&self, peer_id: &PeerId, msg: ServerMessage) {
        if let Some(peer) = self.peers.get(peer_id) {
            if let Err(e) = peer.send(msg) {
                error!("Failed to queue message for {peer_id}: {e}");
            }
        } else {
            warn!("Dropping message for disconnected peer {peer_id}");
        }
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
