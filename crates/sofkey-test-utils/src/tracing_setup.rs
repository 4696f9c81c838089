//! Tracing helpers for tests.
//!
//! [`init_test_tracing`] routes events to the test-harness writer;
//! [`capture_diagnostics`] installs a thread-local collector so a test can
//! assert on the warnings the service emitted.

use sofkey_core::{DiagnosticCollector, DiagnosticReader};
use tracing::Level;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Initialise a global subscriber writing to the test harness, filtered by
/// `RUST_LOG` or `sofkey_core=debug` when unset.
///
/// Calls after the first are no-ops.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("sofkey_core=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Capture WARN and ERROR events on the current thread until the guard is
/// dropped.
///
/// # Example
///
/// ```ignore
/// let (diagnostics, _guard) = capture_diagnostics();
/// service.load_keywords(Some("1999"), None);
/// assert_eq!(diagnostics.len(), 1);
/// ```
pub fn capture_diagnostics() -> (DiagnosticReader, DefaultGuard) {
    let collector = DiagnosticCollector::new(256, Level::WARN);
    let reader = collector.reader();
    let guard = tracing_subscriber::registry().with(collector).set_default();
    (reader, guard)
}
