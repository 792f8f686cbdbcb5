use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("media endpoint failure: {0}")]
pub struct MediaError(pub String);

/// Capability surface of one underlying peer connection.
///
/// SDP and candidate payloads are opaque strings; the engine sequences the
/// calls but never looks inside them. Any implementation works: a browser
/// binding, a native RTC stack, or a mock in tests.
#[async_trait]
pub trait MediaEndpoint: Send + Sync {
    async fn create_offer(&self) -> Result<String, MediaError>;
    async fn create_answer(&self) -> Result<String, MediaError>;
    async fn set_local_description(&self, sdp: String) -> Result<(), MediaError>;
    async fn set_remote_description(&self, sdp: String) -> Result<(), MediaError>;
    async fn add_candidate(&self, candidate: String) -> Result<(), MediaError>;
}

/// Events the capability emits asynchronously once a local description is
/// in place. The host feeds them into `CallEngine::handle_media_event`.
#[derive(Debug, Clone)]
pub enum MediaEvent {
    /// A locally discovered connectivity candidate, ready to be trickled
    /// to the remote peer.
    CandidateDiscovered(String),
    /// Remote media arrived on the connection.
    TrackArrived,
}
