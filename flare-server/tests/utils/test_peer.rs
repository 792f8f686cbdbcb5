use flare_core::{PeerId, RoomId, ServerMessage};
use flare_server::RelayService;
use std::time::Duration;
use tokio::sync::mpsc;

/// Timeout for receiving a relayed message (ms).
pub const RECV_TIMEOUT_MS: u64 = 1000;

/// One simulated connection: talks to the relay through the same channel
/// seam the websocket layer uses, no socket involved.
pub struct TestPeer {
    pub peer_id: PeerId,
    rx: mpsc::UnboundedReceiver<ServerMessage>,
}

impl TestPeer {
    /// Connect to the relay and consume the `Welcome` handshake.
    pub async fn connect(service: &RelayService) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let peer_id = service.connect(tx);
        let mut peer = Self { peer_id, rx };

        match peer.recv().await {
            ServerMessage::Welcome { peer_id: id } => assert_eq!(id, peer.peer_id),
            other => panic!("Expected Welcome, got {other:?}"),
        }

        peer
    }

    /// Join a room and return the roster from the `Joined` reply.
    pub async fn join(&mut self, service: &RelayService, room: &str) -> Vec<PeerId> {
        service.handle_message(
            self.peer_id,
            flare_core::ClientMessage::Join {
                room: RoomId::from(room),
            },
        );

        match self.recv().await {
            ServerMessage::Joined { room: joined, peers } => {
                assert_eq!(joined, RoomId::from(room));
                peers
            }
            other => panic!("Expected Joined, got {other:?}"),
        }
    }

    pub async fn recv(&mut self) -> ServerMessage {
        tokio::time::timeout(Duration::from_millis(RECV_TIMEOUT_MS), self.rx.recv())
            .await
            .expect("Timed out waiting for a server message")
            .expect("Relay dropped the connection channel")
    }

    /// Whatever is queued right now, without waiting.
    pub fn drain_pending(&mut self) -> Vec<ServerMessage> {
        let mut pending = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            pending.push(msg);
        }
        pending
    }
}
