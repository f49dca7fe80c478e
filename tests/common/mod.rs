//! Shared helpers for the integration tests

use std::sync::Once;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Routes `tracing` output through the test harness
///
/// Silent unless `RUST_LOG` is set, e.g. `RUST_LOG=meldheap=trace`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
