//! Test utilities for gofn
//!
//! Helpers shared by unit tests and the integration test target (enabled
//! there through the `test-utils` feature):
//!
//! - [`RecordingRunner`] - a [`CommandRunner`](crate::process::CommandRunner)
//!   that records every command and answers with scripted outputs
//! - [`FunctionFixture`] - writes a function source tree to disk
//! - [`init_test_logging`] - tracing output captured by the test harness
//!
//! # Example
//!
//! ```rust,no_run
//! use gofn::process::CommandOutput;
//! use gofn::test_utils::{FunctionFixture, RecordingRunner};
//!
//! # fn example() -> anyhow::Result<()> {
//! let temp = tempfile::tempdir()?;
//! FunctionFixture::new("fn").with_module("example.com/fn").write_to(temp.path())?;
//!
//! let runner = RecordingRunner::new()
//!     .respond(&["list", "-m"], CommandOutput::success_with("example.com/fn"));
//! # Ok(())
//! # }
//! ```

pub mod fixtures;
pub mod runner;

pub use fixtures::FunctionFixture;
pub use runner::RecordingRunner;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has an effect. With `level` set, that level is used;
/// otherwise `RUST_LOG` is honoured, and without either nothing is logged.
///
/// ```bash
/// RUST_LOG=process=debug cargo test
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
            .with_target(true) // "process", "process::perf"
            .with_thread_ids(false)
            .try_init();
    });
}
