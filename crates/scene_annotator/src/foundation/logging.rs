//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honors `RUST_LOG`; calling it twice panics, like `env_logger::init`.
pub fn init() {
    env_logger::init();
}

/// Initialize logging for unit tests
///
/// Output is captured by the test harness and repeated calls are ignored.
pub fn init_for_tests() {
    let _ = env_logger::builder().is_test(true).try_init();
}
