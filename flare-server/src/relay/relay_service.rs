use crate::registry::ConnectionRegistry;
use crate::room::RoomDirectory;
use flare_core::{ClientMessage, IceServerConfig, PeerId, RoomId, ServerMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

struct RelayInner {
    registry: ConnectionRegistry,
    rooms: RoomDirectory,
    ice_servers: Vec<IceServerConfig>,
}

/// The signaling relay: room presence plus verbatim forwarding of
/// offer/answer/candidate payloads between connections.
///
/// Addressing profile: offers, answers and candidates target a single
/// `PeerId`; presence changes go out as `PeerJoined`/`PeerLeft` events,
/// and a joiner gets the current roster in its `Joined` reply.
#[derive(Clone)]
pub struct RelayService {
    inner: Arc<RelayInner>,
}

impl RelayService {
    pub fn new(ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(RelayInner {
                registry: ConnectionRegistry::new(),
                rooms: RoomDirectory::new(),
                ice_servers,
            }),
        }
    }

    /// Register a freshly opened connection. Mints its identity, greets it
    /// and hands it the ICE configuration.
    pub fn connect(&self, tx: mpsc::UnboundedSender<ServerMessage>) -> PeerId {
        let peer_id = PeerId::new();
        self.inner.registry.register(peer_id, tx);

        self.inner
            .registry
            .send(&peer_id, ServerMessage::Welcome { peer_id });
        if !self.inner.ice_servers.is_empty() {
            self.inner.registry.send(
                &peer_id,
                ServerMessage::IceConfig {
                    ice_servers: self.inner.ice_servers.clone(),
                },
            );
        }

        peer_id
    }

    /// Dispatch one inbound message. Payload blobs are forwarded untouched,
    /// tagged with the sender so the recipient can address its reply.
    pub fn handle_message(&self, sender: PeerId, msg: ClientMessage) {
        match msg {
            ClientMessage::Join { room } => self.handle_join(sender, room),
            ClientMessage::Offer { target, sdp } => {
                self.inner
                    .registry
                    .send(&target, ServerMessage::Offer { from: sender, sdp });
            }
            ClientMessage::Answer { target, sdp } => {
                self.inner
                    .registry
                    .send(&target, ServerMessage::Answer { from: sender, sdp });
            }
            ClientMessage::IceCandidate { target, candidate } => {
                self.inner.registry.send(
                    &target,
                    ServerMessage::IceCandidate {
                        from: sender,
                        candidate,
                    },
                );
            }
        }
    }

    fn handle_join(&self, sender: PeerId, room: RoomId) {
        let (newly_added, others) = self.inner.rooms.join(&room, sender);

        self.inner.registry.send(
            &sender,
            ServerMessage::Joined {
                room: room.clone(),
                peers: others.clone(),
            },
        );

        // A repeated join re-sends the roster to the joiner but the other
        // members are not notified again.
        if !newly_added {
            debug!("Peer {sender} re-joined room '{room}'");
            return;
        }

        for member in &others {
            self.inner.registry.send(
                member,
                ServerMessage::PeerJoined {
                    room: room.clone(),
                    peer_id: sender,
                },
            );
        }
    }

    /// Tear down one connection: drop it from the registry, from every room
    /// it was in, and tell each remaining member. Runs at most once per
    /// identity; duplicate close events fall out at the unregister step.
    pub fn disconnect(&self, peer_id: PeerId) {
        if !self.inner.registry.unregister(&peer_id) {
            debug!("Ignoring duplicate disconnect for {peer_id}");
            return;
        }

        for (room, remaining) in self.inner.rooms.remove_everywhere(&peer_id) {
            for member in remaining {
                self.inner.registry.send(
                    &member,
                    ServerMessage::PeerLeft {
                        room: room.clone(),
                        peer_id,
                    },
                );
            }
        }

        info!("Peer {peer_id} disconnected");
    }

    pub fn is_connected(&self, peer_id: &PeerId) -> bool {
        self.inner.registry.is_connected(peer_id)
    }

    pub fn members_excluding(&self, room: &RoomId, peer: &PeerId) -> Vec<PeerId> {
        self.inner.rooms.members_excluding(room, peer)
    }
}
