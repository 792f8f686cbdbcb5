mod test_message_to_departed_peer_dropped;
