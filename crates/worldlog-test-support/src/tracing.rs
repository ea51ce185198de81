//! Test tracing — routes `tracing` output through the libtest capture.

use tracing_subscriber::EnvFilter;

/// Installs a global `fmt` subscriber writing to the test harness.
///
/// Filtering follows `RUST_LOG`, defaulting to `debug`. Safe to call from
/// every test; only the first call installs the subscriber.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
