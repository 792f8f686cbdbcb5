use flare_core::{ClientMessage, ServerMessage};

use crate::integration::{create_relay, init_tracing};
use crate::utils::TestPeer;

/// The relay never inspects candidate blobs; whatever string goes in must
/// come out unchanged, whitespace and all.
#[tokio::test]
async fn test_payload_forwarded_verbatim() {
    init_tracing();
    let relay = create_relay();

    let alice = TestPeer::connect(&relay).await;
    let mut bob = TestPeer::connect(&relay).await;

    let blob =
        "  {\"candidate\":\"candidate:1 1 UDP 2122252543 192.0.2.1 54321 typ host\",\"sdpMid\":\"0\"} \n";
    relay.handle_message(
        alice.peer_id,
        ClientMessage::IceCandidate {
            target: bob.peer_id,
            candidate: blob.to_string(),
        },
    );

    match bob.recv().await {
        ServerMessage::IceCandidate { from, candidate } => {
            assert_eq!(from, alice.peer_id);
            assert_eq!(candidate, blob);
        }
        other => panic!("Expected IceCandidate, got {other:?}"),
    }
}
