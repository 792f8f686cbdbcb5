mod test_duplicate_join_not_rebroadcast;
mod test_join_notifies_existing_members;
