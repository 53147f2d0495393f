//! Log output for test runs.
//!
//! The builder and client emit `tracing` events at `debug` (each dispatch)
//! and `trace` (identifier resolution). Call [`init_test_logging`] at the
//! start of a test to see them:
//!
//! ```
//! jsonapi_test::logging::init_test_logging();
//! ```
//!
//! The filter is read from `RUST_LOG` and defaults to `warn`.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Default filter when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "warn";

/// Installs a human-readable subscriber that writes through the test harness.
///
/// Safe to call from every test; only the first call installs a subscriber.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_test_writer()
        .with_target(true)
        .with_filter(filter);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_test_logging_twice_does_not_panic() {
        init_test_logging();
        init_test_logging();
        tracing::debug!("logging initialised");
    }
}
