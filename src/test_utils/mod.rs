//! Test utilities for context-copy
//!
//! Shared by the crate's unit tests and, through the `test-utils` feature, by
//! the `tests/` targets:
//! - [`init_test_logging`] wires `tracing` output into the test harness
//! - [`fixtures`] builds workspace snapshots and import workspaces
//!
//! ```rust,no_run
//! use context_copy::test_utils::{SnapshotFixture, init_test_logging};
//!
//! init_test_logging(None);
//! let resolver = SnapshotFixture::foo_class().into_resolver("/ws").unwrap();
//! ```

pub mod fixtures;

pub use fixtures::{ImportFixture, ImportWorkspace, SnapshotFixture, symbol};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests, once per process.
///
/// `level` wins over `RUST_LOG`. With neither set, nothing is installed.
///
/// ```bash
/// RUST_LOG=context_copy=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
