//! Logging macros gated by a module-level `ENABLE_LOGS` flag.
//!
//! The ingestion path logs on every poll tick, which gets noisy fast. Each
//! module that uses these macros declares whether its output is wanted:
//!
//! ```ignore
//! const ENABLE_LOGS: bool = true;
//!
//! use crate::{log_debug, log_error, log_info, log_warn};
//!
//! log_info!("scan pass committed {} entries", 3);
//! ```
//!
//! The level filter configured through `RUST_LOG` still applies on top.

/// Forwards to `log::info!` when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// Forwards to `log::warn!` when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// Forwards to `log::error!` when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// Forwards to `log::debug!` when the calling module sets `ENABLE_LOGS`.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}
