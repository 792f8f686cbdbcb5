use flare_core::{ClientMessage, PeerId};

use crate::integration::{create_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_unknown_target_dropped() {
    init_tracing();
    let relay = create_relay();

    let mut alice = TestPeer::connect(&relay).await;

    // Nobody has this identity; the message is dropped and the sender hears
    // nothing back.
    relay.handle_message(
        alice.peer_id,
        ClientMessage::Offer {
            target: PeerId::new(),
            sdp: "sdp".to_string(),
        },
    );

    assert!(alice.drain_pending().is_empty());
    assert!(relay.is_connected(&alice.peer_id));
}
