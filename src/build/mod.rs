//! Native extension building
//!
//! Compiles a PHP extension from source the way `pecl install` does on Unix:
//! phpize in the source tree, then configure, make and make install in a
//! temporary out-of-tree workspace.

pub mod command;
pub mod log;
pub mod options;
pub mod session;
pub mod types;
pub mod workspace;

pub use command::{OUTPUT_TAG, OutputCallback, run_command};
pub use log::{BuildLog, LogLevel};
pub use options::{ConfigureOption, OptionKind, configure_flags, primary_flag};
pub use session::BuildSession;
pub use types::{BuildError, BuildReport, CommandStatus, InstallOutcome, Stage, Toolchain};
pub use workspace::Workspace;
