//! Pickle internal library code

pub mod build;
pub mod config;
pub mod debug;
pub mod env_vars;
pub mod package;

// Re-export common types for convenience
pub use build::{
    BuildError, BuildLog, BuildReport, BuildSession, ConfigureOption, InstallOutcome, LogLevel,
    OptionKind, OutputCallback, Stage, Toolchain, Workspace,
};
pub use config::Config;
pub use debug::{debug_log, init_debug, is_debug_enabled};
pub use package::{Package, PackageError};
