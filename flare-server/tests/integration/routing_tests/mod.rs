mod test_payload_forwarded_verbatim;
mod test_unknown_target_dropped;
