pub mod disconnect_tests;
pub mod membership_tests;
pub mod routing_tests;

use tracing::Level;

use flare_server::RelayService;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn create_relay() -> RelayService {
    RelayService::new(Vec::new())
}
