use crate::media::{MediaEndpoint, MediaEvent};
use crate::negotiation::NegotiationSession;
use async_trait::async_trait;
use flare_core::{ClientMessage, IceServerConfig, PeerId, RoomId, ServerMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tracing::{info, warn};

/// Outbound side of the signaling channel. The websocket transport (or a
/// mock in tests) implements this; the engine only pushes, never waits for
/// delivery.
#[async_trait]
pub trait SignalSink: Send + Sync {
    async fn send(&self, msg: ClientMessage);
}

/// Notifications the engine surfaces to the embedding application.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    Joined { room: RoomId, peers: Vec<PeerId> },
    PeerJoined { room: RoomId, peer_id: PeerId },
    PeerLeft { room: RoomId, peer_id: PeerId },
    TrackArrived { peer_id: PeerId },
}

type MediaFactory = Arc<dyn Fn() -> Arc<dyn MediaEndpoint> + Send + Sync>;

/// Client-side negotiation driver: one `NegotiationSession` per remote
/// peer, created on the first outgoing call or the first inbound
/// offer/candidate from that peer.
pub struct CallEngine {
    media_factory: MediaFactory,
    sink: Arc<dyn SignalSink>,
    sessions: Mutex<HashMap<PeerId, Arc<NegotiationSession>>>,
    local_peer_id: Mutex<Option<PeerId>>,
    ice_servers: Mutex<Vec<IceServerConfig>>,
    events: mpsc::UnboundedSender<EngineEvent>,
}

impl CallEngine {
    pub fn new<F>(
        media_factory: F,
        sink: Arc<dyn SignalSink>,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>)
    where
        F: Fn() -> Arc<dyn MediaEndpoint> + Send + Sync + 'static,
    {
        let (events, event_rx) = mpsc::unbounded_channel();
        let engine = Self {
            media_factory: Arc::new(media_factory),
            sink,
            sessions: Mutex::new(HashMap::new()),
            local_peer_id: Mutex::new(None),
            ice_servers: Mutex::new(Vec::new()),
            events,
        };
        (engine, event_rx)
    }

    /// Identity assigned by the relay, known once `Welcome` arrived.
    pub async fn local_peer_id(&self) -> Option<PeerId> {
        *self.local_peer_id.lock().await
    }

    pub async fn ice_servers(&self) -> Vec<IceServerConfig> {
        self.ice_servers.lock().await.clone()
    }

    pub async fn session(&self, peer: &PeerId) -> Option<Arc<NegotiationSession>> {
        self.sessions.lock().await.get(peer).cloned()
    }

    async fn ensure_session(&self, peer: PeerId) -> Arc<NegotiationSession> {
        self.sessions
            .lock()
            .await
            .entry(peer)
            .or_insert_with(|| Arc::new(NegotiationSession::new((self.media_factory)())))
            .clone()
    }

    pub async fn join(&self, room: RoomId) {
        self.sink.send(ClientMessage::Join { room }).await;
    }

    /// Start an outgoing call: drive the local offer and send it.
    pub async fn call(&self, target: PeerId) {
        let session = self.ensure_session(target).await;
        match session.start_offer().await {
            Ok(sdp) => self.sink.send(ClientMessage::Offer { target, sdp }).await,
            Err(e) => warn!("Failed to start call to {target}: {e}"),
        }
    }

    /// Dispatch one message from the relay. Negotiation failures are logged
    /// and leave the session where it was; nothing here tears it down.
    pub async fn handle_signal(&self, msg: ServerMessage) {
        match msg {
            ServerMessage::Welcome { peer_id } => {
                info!("Connected to relay as {peer_id}");
                *self.local_peer_id.lock().await = Some(peer_id);
            }
            ServerMessage::IceConfig { ice_servers } => {
                *self.ice_servers.lock().await = ice_servers;
            }
            ServerMessage::Joined { room, peers } => {
                let _ = self.events.send(EngineEvent::Joined { room, peers });
            }
            ServerMessage::PeerJoined { room, peer_id } => {
                let _ = self.events.send(EngineEvent::PeerJoined { room, peer_id });
            }
            ServerMessage::PeerLeft { room, peer_id } => {
                let _ = self.events.send(EngineEvent::PeerLeft { room, peer_id });
            }
            ServerMessage::Offer { from, sdp } => {
                let session = self.ensure_session(from).await;
                match session.accept_offer(sdp).await {
                    Ok(answer) => {
                        self.sink
                            .send(ClientMessage::Answer {
                                target: from,
                                sdp: answer,
                            })
                            .await;
                    }
                    Err(e) => warn!("Failed to answer offer from {from}: {e}"),
                }
            }
            ServerMessage::Answer { from, sdp } => {
                let Some(session) = self.session(&from).await else {
                    warn!("Answer from {from} without a pending offer");
                    return;
                };
                if let Err(e) = session.accept_answer(sdp).await {
                    warn!("Failed to apply answer from {from}: {e}");
                }
            }
            ServerMessage::IceCandidate { from, candidate } => {
                // A trickled candidate can outrun the offer it belongs to;
                // the session buffers it either way.
                let session = self.ensure_session(from).await;
                session.receive_candidate(candidate).await;
            }
        }
    }

    /// Feed one event from the media capability backing the session with
    /// `peer`. Local candidates are trickled out immediately, never
    /// buffered on this side.
    pub async fn handle_media_event(&self, peer: PeerId, event: MediaEvent) {
        match event {
            MediaEvent::CandidateDiscovered(candidate) => {
                self.sink
                    .send(ClientMessage::IceCandidate {
                        target: peer,
                        candidate,
                    })
                    .await;
            }
            MediaEvent::TrackArrived => {
                let _ = self.events.send(EngineEvent::TrackArrived { peer_id: peer });
            }
        }
    }
}
