use flare_core::ClientMessage;

use crate::integration::{create_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_message_to_departed_peer_dropped() {
    init_tracing();
    let relay = create_relay();

    let mut alice = TestPeer::connect(&relay).await;
    let bob = TestPeer::connect(&relay).await;

    alice.join(&relay, "lobby").await;
    relay.disconnect(bob.peer_id);
    assert!(!relay.is_connected(&bob.peer_id));

    // A message that raced the disconnect is dropped, not misrouted.
    relay.handle_message(
        alice.peer_id,
        ClientMessage::Offer {
            target: bob.peer_id,
            sdp: "late".to_string(),
        },
    );
    assert!(alice.drain_pending().is_empty());
}
