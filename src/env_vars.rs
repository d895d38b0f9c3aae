//! Environment variable handling.
//!
//! Environment settings take priority over the TOML config file and are
//! themselves overridden by command-line flags.

use std::env;
use std::path::PathBuf;

// Helper for boolean environment variables that accept "1", "true", "yes"
fn is_enabled(var: &str) -> bool {
    env::var(var).ok().is_some_and(|s| {
        let s = s.to_lowercase();
        s == "1" || s == "true" || s == "yes"
    })
}

/// Enable debug output (`PICKLE_DEBUG`).
pub fn pickle_debug() -> bool {
    is_enabled("PICKLE_DEBUG")
}

/// Keep the build workspace after `pickle build` (`PICKLE_KEEP_WORKSPACE`).
pub fn keep_workspace() -> bool {
    is_enabled("PICKLE_KEEP_WORKSPACE")
}

/// Root directory under which build workspaces are created (`PICKLE_TMPDIR`).
///
/// Empty values are ignored so `PICKLE_TMPDIR=` falls back to the system
/// temp directory.
pub fn pickle_tmpdir() -> Option<PathBuf> {
    env::var("PICKLE_TMPDIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Get make command override (e.g., "gmake" on BSD).
pub fn make_command() -> Option<String> {
    env::var("MAKE").ok().filter(|s| !s.is_empty())
}

/// Get phpize command override (e.g., "phpize8.3" on Debian).
pub fn phpize_command() -> Option<String> {
    env::var("PHPIZE").ok().filter(|s| !s.is_empty())
}

/// Get config file path override (`PICKLE_CONFIG`).
pub fn pickle_config() -> Option<String> {
    env::var("PICKLE_CONFIG").ok().filter(|s| !s.is_empty())
}
