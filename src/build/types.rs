//! Build pipeline type definitions
//!
//! Stages, outcomes and errors shared by the workspace manager, the command
//! runner and the build session.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Exit code reported when a child ended without one (killed by a signal).
pub const NO_EXIT_CODE: i32 = -1;

/// Where a build session is in the pipeline
///
/// Stages only move forward: `Created -> PhpizeDone -> Configured -> Built ->
/// Installed`. `Failed` is absorbing and is entered when phpize, configure or
/// make exits non-zero or a command cannot be started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Created,
    PhpizeDone,
    Configured,
    Built,
    Installed,
    Failed,
}

impl Stage {
    /// Get a human-readable description
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::PhpizeDone => "phpize done",
            Self::Configured => "configured",
            Self::Built => "built",
            Self::Installed => "installed",
            Self::Failed => "failed",
        }
    }
}

/// Result of `make install`
///
/// Install failures never abort a build; they are reported here instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallOutcome {
    /// `make install` exited with code zero
    Installed,
    /// `make install` exited non-zero and the failure was ignored
    FailedIgnored { code: i32 },
}

impl InstallOutcome {
    #[must_use]
    pub const fn is_installed(self) -> bool {
        matches!(self, Self::Installed)
    }
}

/// Exit status of one shell command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    /// Exit code, or [`NO_EXIT_CODE`] when the process was killed
    pub code: i32,
}

impl CommandStatus {
    #[must_use]
    pub const fn success(self) -> bool {
        self.code == 0
    }
}

/// External build tools invoked by a session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    /// Command run in the package root before configuring
    pub phpize: String,
    /// Command run in the workspace to compile (and, with `install`, to install)
    pub make: String,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            phpize: "phpize".to_string(),
            make: "make".to_string(),
        }
    }
}

/// Summary of a completed pipeline run
#[derive(Debug)]
pub struct BuildReport {
    /// Extension name
    pub name: String,
    /// Extension version
    pub version: String,
    /// Workspace the extension was built in
    pub workspace: PathBuf,
    /// What happened during `make install`
    pub install: InstallOutcome,
    /// Wall-clock time from phpize to install
    pub duration: Duration,
}

/// Errors raised by the build pipeline
#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "Option {name} is not well-formed; its type must be \"enable\" or \"disable\", got \"{kind}\""
    )]
    InvalidOption { name: String, kind: String },

    #[error("Failed to run the following command: {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read output of: {command}")]
    Output {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("phpize failed")]
    PhpizeFailed,

    #[error("configure failed, see log at {}", log_path.display())]
    ConfigureFailed { log_path: PathBuf },

    #[error("make failed")]
    MakeFailed,

    #[error("Workspace operation failed on {}", path.display())]
    Workspace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
