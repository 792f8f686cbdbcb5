use crate::media::{MediaEndpoint, MediaError};
use std::collections::VecDeque;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Where the handshake with one remote peer currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    Idle,
    LocalOfferPending,
    RemoteApplied,
    Stable,
}

#[derive(Debug, Error)]
pub enum NegotiationError {
    #[error("cannot {action} while negotiation is {phase:?}")]
    InvalidPhase {
        action: &'static str,
        phase: NegotiationPhase,
    },
    #[error(transparent)]
    Media(#[from] MediaError),
}

struct SessionState {
    phase: NegotiationPhase,
    pending_candidates: VecDeque<String>,
}

/// Offer/answer handshake with one remote peer.
///
/// Candidates that arrive before the remote description is applied are
/// buffered, then drained exactly once, in receipt order, right after
/// `set_remote_description` succeeds. Phase and queue live under one lock,
/// so deciding apply-or-buffer can never interleave with the transition
/// that makes the remote description current.
pub struct NegotiationSession {
    media: Arc<dyn MediaEndpoint>,
    state: Mutex<SessionState>,
}

impl NegotiationSession {
    pub fn new(media: Arc<dyn MediaEndpoint>) -> Self {
        Self {
            media,
            state: Mutex::new(SessionState {
                phase: NegotiationPhase::Idle,
                pending_candidates: VecDeque::new(),
            }),
        }
    }

    pub async fn phase(&self) -> NegotiationPhase {
        self.state.lock().await.phase
    }

    /// Outgoing leg: create and install a local offer. Returns the SDP to
    /// send to the remote peer.
    pub async fn start_offer(&self) -> Result<String, NegotiationError> {
        let mut state = self.state.lock().await;
        if state.phase != NegotiationPhase::Idle {
            return Err(NegotiationError::InvalidPhase {
                action: "create an offer",
                phase: state.phase,
            });
        }

        let sdp = self.media.create_offer().await?;
        self.media.set_local_description(sdp.clone()).await?;
        state.phase = NegotiationPhase::LocalOfferPending;
        Ok(sdp)
    }

    /// Incoming leg: apply the remote offer and produce the answer SDP to
    /// send back. Buffered candidates are applied before this returns.
    pub async fn accept_offer(&self, remote_sdp: String) -> Result<String, NegotiationError> {
        let mut state = self.state.lock().await;
        if state.phase != NegotiationPhase::Idle {
            return Err(NegotiationError::InvalidPhase {
                action: "accept an offer",
                phase: state.phase,
            });
        }

        self.media.set_remote_description(remote_sdp).await?;
        state.phase = NegotiationPhase::RemoteApplied;

        // Drain directly after the transition; a failure producing the
        // answer below must not strand the buffered candidates.
        Self::drain_pending(&self.media, &mut state).await;

        let answer = self.media.create_answer().await?;
        self.media.set_local_description(answer.clone()).await?;

        state.phase = NegotiationPhase::Stable;
        Ok(answer)
    }

    /// Outgoing leg, second half: apply the remote answer.
    pub async fn accept_answer(&self, remote_sdp: String) -> Result<(), NegotiationError> {
        let mut state = self.state.lock().await;
        if state.phase != NegotiationPhase::LocalOfferPending {
            return Err(NegotiationError::InvalidPhase {
                action: "apply an answer",
                phase: state.phase,
            });
        }

        self.media.set_remote_description(remote_sdp).await?;
        state.phase = NegotiationPhase::RemoteApplied;

        Self::drain_pending(&self.media, &mut state).await;
        state.phase = NegotiationPhase::Stable;
        Ok(())
    }

    /// A candidate from the remote peer: applied now if the remote
    /// description is in place, buffered otherwise. Never dropped.
    pub async fn receive_candidate(&self, candidate: String) {
        let mut state = self.state.lock().await;
        match state.phase {
            NegotiationPhase::RemoteApplied | NegotiationPhase::Stable => {
                if let Err(e) = self.media.add_candidate(candidate).await {
                    warn!("Failed to apply remote candidate: {e}");
                }
            }
            NegotiationPhase::Idle | NegotiationPhase::LocalOfferPending => {
                debug!("Buffering candidate until the remote description is applied");
                state.pending_candidates.push_back(candidate);
            }
        }
    }

    /// How many candidates are waiting for the remote description.
    pub async fn pending_candidates(&self) -> usize {
        self.state.lock().await.pending_candidates.len()
    }

    /// One failed candidate must not block the ones queued behind it.
    async fn drain_pending(media: &Arc<dyn MediaEndpoint>, state: &mut SessionState) {
        while let Some(candidate) = state.pending_candidates.pop_front() {
            if let Err(e) = media.add_candidate(candidate).await {
                warn!("Failed to apply buffered candidate: {e}");
            }
        }
    }
}
