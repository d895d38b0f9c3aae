//! Debug logging utilities
//!
//! Provides debug logging that respects the global --debug flag (or
//! `PICKLE_DEBUG`). When debug mode is disabled, all debug logging has zero
//! cost. This is the diagnostic stream: workspace removals and every build log
//! entry are echoed here.

use std::sync::OnceLock;

static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();

/// Initialize debug mode from command-line flag
///
/// The `PICKLE_DEBUG` environment variable turns debug output on even when the
/// flag is absent. Only the first call has any effect.
pub fn init_debug(enabled: bool) {
    if DEBUG_ENABLED
        .set(enabled || crate::env_vars::pickle_debug())
        .is_err()
    {
        debug_log("debug mode already initialized");
    }
}

/// Check if debug mode is enabled
pub fn is_debug_enabled() -> bool {
    DEBUG_ENABLED.get().copied().unwrap_or(false)
}

/// Print a debug message if debug mode is enabled
pub fn debug_log(message: &str) {
    if is_debug_enabled() {
        eprintln!("[DEBUG] {message}");
    }
}

/// Macro for convenient debug logging
///
/// Usage: `debug!("message with {}", variable)`
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        if $crate::debug::is_debug_enabled() {
            eprintln!("[DEBUG] {}", format_args!($($arg)*));
        }
    };
}
