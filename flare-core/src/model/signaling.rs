use crate::model::peer::PeerId;
use crate::model::room::RoomId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

/// Messages a client sends to the relay. SDP and candidate payloads are
/// opaque strings; the relay forwards them untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ClientMessage {
    Join {
        room: RoomId,
    },
    Offer {
        target: PeerId,
        sdp: String,
    },
    Answer {
        target: PeerId,
        sdp: String,
    },
    IceCandidate {
        target: PeerId,
        candidate: String,
    },
}

/// Messages the relay sends to a client. Relayed offers/answers/candidates
/// are tagged with the sender's id so the recipient can address its reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "d")]
pub enum ServerMessage {
    Welcome {
        peer_id: PeerId,
    },
    IceConfig {
        ice_servers: Vec<IceServerConfig>,
    },
    /// Roster reply to a join: everyone already in the room.
    Joined {
        room: RoomId,
        peers: Vec<PeerId>,
    },
    PeerJoined {
        room: RoomId,
        peer_id: PeerId,
    },
    PeerLeft {
        room: RoomId,
        peer_id: PeerId,
    },
    Offer {
        from: PeerId,
        sdp: String,
    },
    Answer {
        from: PeerId,
        sdp: String,
    },
    IceCandidate {
        from: PeerId,
        candidate: String,
    },
}
