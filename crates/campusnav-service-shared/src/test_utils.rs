//! Fixtures for handler tests backed by the bundled campus.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use campusnav_lib::Navigator;

use crate::state::AppState;

static TEST_STATE: OnceLock<AppState> = OnceLock::new();
static REQUEST_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Shared state over the bundled campus with default traffic and speed.
///
/// # Panics
///
/// Panics if the bundled topology fails to load.
pub fn test_state() -> AppState {
    TEST_STATE
        .get_or_init(|| {
            let navigator = Navigator::from_env(None)
                .unwrap_or_else(|e| panic!("failed to load bundled campus: {}", e));
            AppState::from_navigator(navigator)
        })
        .clone()
}

/// Location names from the bundled campus.
pub mod fixture_locations {
    pub const COMPUTER_SCIENCE: &str = "Computer Science Department";
    pub const REGISTRY: &str = "Registry";
    pub const CAFETERIA: &str = "Cafeteria";
    pub const BALME_LIBRARY: &str = "Balme Library";
    pub const BOTANICAL_GARDEN: &str = "Botanical Garden";
}

/// Unique request id for a test.
pub fn test_request_id() -> String {
    let n = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("test-{}-{}", std::process::id(), n)
}
