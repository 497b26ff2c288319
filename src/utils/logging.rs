//! Conditional logging macros gated by a module-level `ENABLE_LOGS` flag and
//! tagged with the module's `LOG_TARGET`.
//!
//! Usage:
//! ```rust,ignore
//! // In your module, define both consts first:
//! const ENABLE_LOGS: bool = true;
//! const LOG_TARGET: &str = "longevity_log::parser";
//!
//! // Then use the macros (they're exported at the crate root):
//! use crate::{log_info, log_warn};
//!
//! log_info!("parsed {} items", 3);
//! ```
//!
//! Filtering by target works with `RUST_LOG`, e.g.
//! `RUST_LOG=longevity_log::db=debug`.

/// Initialize `env_logger` from `RUST_LOG`, defaulting to Info.
///
/// Safe to call more than once; later calls are ignored.
pub fn init() {
    let _ = env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .try_init();
}

/// Conditional debug logging.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!(target: LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional info logging.
///
/// Each module that uses this macro must define:
/// ```rust,ignore
/// const ENABLE_LOGS: bool = true; // or false
/// const LOG_TARGET: &str = "longevity_log::<module>";
/// ```
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!(target: LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional warn logging.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!(target: LOG_TARGET, $($arg)*);
        }
    };
}

/// Conditional error logging.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!(target: LOG_TARGET, $($arg)*);
        }
    };
}
