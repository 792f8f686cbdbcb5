use flare_core::ServerMessage;

use crate::integration::{create_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_duplicate_join_not_rebroadcast() {
    init_tracing();
    let relay = create_relay();

    let mut alice = TestPeer::connect(&relay).await;
    let mut bob = TestPeer::connect(&relay).await;

    alice.join(&relay, "lobby").await;
    bob.join(&relay, "lobby").await;
    assert!(matches!(
        alice.recv().await,
        ServerMessage::PeerJoined { .. }
    ));

    // Joining again still answers with the roster but must not notify the
    // other members a second time.
    let roster = bob.join(&relay, "lobby").await;
    assert_eq!(roster, vec![alice.peer_id]);
    assert!(alice.drain_pending().is_empty());
}
