// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

//! Logging for the weather readings workspace.
//!
//! All crates log through the macros exported here so the sink and the
//! level filter are configured in exactly one place.
//!
//! The level comes from the `WEATHER_LOG` environment variable:
//! - `off` (default) - nothing is emitted
//! - `error`, `warn`, `info`, `debug` - minimum level written to stderr

use std::sync::Once;

// Re-export emit so the macros resolve from any crate
pub use emit;

/// Environment variable holding the log level
pub const LOG_ENV_VAR: &str = "WEATHER_LOG";

static INIT: Once = Once::new();

/// Result of interpreting a `WEATHER_LOG` value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogSetting {
    Off,
    Min(emit::Level),
    /// Unrecognised value, falls back to info
    Unknown,
}

/// Map a raw `WEATHER_LOG` value to a setting. Matching ignores case
/// and surrounding whitespace.
pub fn parse_log_setting(value: &str) -> LogSetting {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "off" => LogSetting::Off,
        "error" => LogSetting::Min(emit::Level::Error),
        "warn" => LogSetting::Min(emit::Level::Warn),
        "info" => LogSetting::Min(emit::Level::Info),
        "debug" => LogSetting::Min(emit::Level::Debug),
        _ => LogSetting::Unknown,
    }
}

/// Initialize diagnostics from `WEATHER_LOG`.
///
/// Call once at startup; later calls are ignored.
pub fn init_diagnostics() {
    INIT.call_once(|| {
        let raw = std::env::var(LOG_ENV_VAR).unwrap_or_default();

        let min = match parse_log_setting(&raw) {
            LogSetting::Off => return,
            LogSetting::Min(level) => level,
            LogSetting::Unknown => {
                // Bootstrap warning, the emitter is not running yet
                eprintln!("Warning: Unknown {LOG_ENV_VAR} value '{raw}', using 'info'");
                emit::Level::Info
            }
        };

        let rt = emit::setup()
            .emit_to(emit_term::stderr())
            .emit_when(emit::level::min_filter(min))
            .init();

        // The runtime must outlive every caller; the process owns it from here
        std::mem::forget(rt);
    });
}

/// Log normal operations a user may want to follow
/// (queries received, responses assembled).
#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Log per-step detail: fetch paths, archive members, row counts.
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Log recoverable conditions such as a missing file or an unmapped sensor kind.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Log unexpected faults: transport failures, corrupt archives, bad rows.
#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

/// Long-name alias of [`info!`]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::emit::info!($($arg)*)
    };
}

/// Long-name alias of [`debug!`]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        $crate::emit::debug!($($arg)*)
    };
}

/// Long-name alias of [`warn!`]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::emit::warn!($($arg)*)
    };
}

/// Long-name alias of [`error!`]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::emit::error!($($arg)*)
    };
}

pub use init_diagnostics as init;
