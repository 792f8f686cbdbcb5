use flare_core::{RoomId, ServerMessage};

use crate::integration::{create_relay, init_tracing};
use crate::utils::TestPeer;

#[tokio::test]
async fn test_join_notifies_existing_members() {
    init_tracing();
    let relay = create_relay();

    let mut alice = TestPeer::connect(&relay).await;
    let mut bob = TestPeer::connect(&relay).await;

    let roster = alice.join(&relay, "lobby").await;
    assert!(roster.is_empty(), "First joiner should see an empty room");

    let roster = bob.join(&relay, "lobby").await;
    assert_eq!(roster, vec![alice.peer_id], "Joiner gets the current roster");

    match alice.recv().await {
        ServerMessage::PeerJoined { room, peer_id } => {
            assert_eq!(room, RoomId::from("lobby"));
            assert_eq!(peer_id, bob.peer_id);
        }
        other => panic!("Expected PeerJoined, got {other:?}"),
    }

    assert!(bob.drain_pending().is_empty(), "Joiner gets no event for itself");
}
