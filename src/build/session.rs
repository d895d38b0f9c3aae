//! Build session
//!
//! Drives the standard out-of-tree build of a PHP extension:
//! ```bash
//! cd <root> && phpize
//! cd /tmp/pickle-<name><version> && <root>/configure --enable-<name>=shared ...
//! make
//! make install
//! ```
//! Each stage hands its working directory to the child process, so the
//! caller's working directory is the same after every stage, failed or not.

use super::command::{OutputCallback, run_command};
use super::log::{BuildLog, LogLevel};
use super::options::{ConfigureOption, configure_arguments, configure_flags, primary_flag};
use super::types::{BuildError, BuildReport, CommandStatus, InstallOutcome, Stage, Toolchain};
use super::workspace::Workspace;
use crate::package::Package;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Log written by `configure` inside the workspace
pub const CONFIGURE_LOG: &str = "config.log";

/// State of one build attempt for one package
#[derive(Debug)]
pub struct BuildSession<'a> {
    package: &'a Package,
    /// Options turned into `--enable-*`/`--disable-*` flags
    options: Vec<ConfigureOption>,
    log: BuildLog,
    /// Working directory of the process when the session was created
    original_dir: Option<PathBuf>,
    temp_root: PathBuf,
    toolchain: Toolchain,
    callback: Option<Box<dyn OutputCallback + 'a>>,
    workspace: Option<Workspace>,
    stage: Stage,
}

impl<'a> BuildSession<'a> {
    /// Create a session for `package` with the given configure options.
    ///
    /// Workspaces go under the system temp directory and the default
    /// `phpize`/`make` toolchain is used until overridden.
    #[must_use]
    pub fn new(package: &'a Package, options: Vec<ConfigureOption>) -> Self {
        Self {
            package,
            options,
            log: BuildLog::new(),
            original_dir: std::env::current_dir().ok(),
            temp_root: std::env::temp_dir(),
            toolchain: Toolchain::default(),
            callback: None,
            workspace: None,
            stage: Stage::Created,
        }
    }

    #[must_use]
    pub fn with_toolchain(mut self, toolchain: Toolchain) -> Self {
        self.toolchain = toolchain;
        self
    }

    #[must_use]
    pub fn with_temp_root(mut self, temp_root: impl Into<PathBuf>) -> Self {
        self.temp_root = temp_root.into();
        self
    }

    /// Send command output to `callback` instead of the build log.
    #[must_use]
    pub fn with_callback(mut self, callback: Box<dyn OutputCallback + 'a>) -> Self {
        self.callback = Some(callback);
        self
    }

    #[must_use]
    pub fn package(&self) -> &Package {
        self.package
    }

    #[must_use]
    pub fn options(&self) -> &[ConfigureOption] {
        &self.options
    }

    #[must_use]
    pub fn log(&self) -> &BuildLog {
        &self.log
    }

    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[must_use]
    pub fn original_dir(&self) -> Option<&Path> {
        self.original_dir.as_deref()
    }

    /// The workspace, once one has been allocated
    #[must_use]
    pub fn workspace(&self) -> Option<&Workspace> {
        self.workspace.as_ref()
    }

    /// Where this session's workspace lives (allocated or not)
    #[must_use]
    pub fn workspace_path(&self) -> PathBuf {
        self.planned_workspace().path().to_path_buf()
    }

    /// Allocate a fresh workspace, wiping any stale one from an earlier run.
    pub fn create_temp_dir(&mut self) -> Result<&Path, BuildError> {
        let workspace = self.planned_workspace();
        workspace.allocate()?;
        self.log.log(
            LogLevel::Info,
            &format!("workspace: {}", workspace.path().display()),
        );
        Ok(self.workspace.insert(workspace).path())
    }

    /// Remove the allocated workspace. Does nothing if there is none.
    pub fn cleanup(&mut self) -> Result<(), BuildError> {
        match &self.workspace {
            Some(workspace) => workspace.release(),
            None => Ok(()),
        }
    }

    /// Run phpize in the package root.
    pub fn phpize(&mut self) -> Result<(), BuildError> {
        let root = self.root_dir();
        let phpize = self.toolchain.phpize.clone();

        if !self.execute(&phpize, &root)?.success() {
            return Err(self.fail(BuildError::PhpizeFailed));
        }
        self.stage = Stage::PhpizeDone;
        Ok(())
    }

    /// The full `configure` command line for this session.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidOption`] if any option has an unknown type.
    pub fn configure_command(&self) -> Result<String, BuildError> {
        let flags = configure_flags(&self.options)?;
        let primary = primary_flag(self.package.name(), self.package.configure_options())?;

        Ok(format!(
            "{}/configure {}",
            self.root_dir().display(),
            configure_arguments(&primary, &flags)
        ))
    }

    /// Run `<root>/configure` from inside the workspace.
    pub fn configure(&mut self) -> Result<(), BuildError> {
        let command = self.configure_command().map_err(|e| self.fail(e))?;
        let workspace = self.ensure_workspace()?;

        if !self.execute(&command, &workspace)?.success() {
            return Err(self.fail(BuildError::ConfigureFailed {
                log_path: workspace.join(CONFIGURE_LOG),
            }));
        }
        self.stage = Stage::Configured;
        Ok(())
    }

    /// Run make in the workspace.
    pub fn build(&mut self) -> Result<(), BuildError> {
        let workspace = self.ensure_workspace()?;
        let make = self.toolchain.make.clone();

        if !self.execute(&make, &workspace)?.success() {
            return Err(self.fail(BuildError::MakeFailed));
        }
        self.stage = Stage::Built;
        Ok(())
    }

    /// Run `make install` in the workspace.
    ///
    /// A non-zero exit is reported as [`InstallOutcome::FailedIgnored`] and the
    /// session still ends up [`Stage::Installed`].
    ///
    /// # Errors
    ///
    /// Only fails when the command cannot be started or its output read.
    pub fn install(&mut self) -> Result<InstallOutcome, BuildError> {
        let workspace = self.ensure_workspace()?;
        let command = format!("{} install", self.toolchain.make);

        let status = self.execute(&command, &workspace)?;
        self.stage = Stage::Installed;

        if status.success() {
            Ok(InstallOutcome::Installed)
        } else {
            self.log.log(
                LogLevel::Info,
                &format!("ignoring failed install (exit code {})", status.code),
            );
            Ok(InstallOutcome::FailedIgnored { code: status.code })
        }
    }

    /// Allocate a workspace and run every stage in order.
    ///
    /// Option errors are reported before the workspace is allocated or any
    /// command runs. The workspace is left in place; call [`Self::cleanup`]
    /// when done.
    pub fn run(&mut self) -> Result<BuildReport, BuildError> {
        let start = Instant::now();

        self.configure_command().map_err(|e| self.fail(e))?;
        self.create_temp_dir()?;
        self.phpize()?;
        self.configure()?;
        self.build()?;
        let install = self.install()?;

        Ok(BuildReport {
            name: self.package.name().to_string(),
            version: self.package.version().to_string(),
            workspace: self.workspace_path(),
            install,
            duration: start.elapsed(),
        })
    }

    fn planned_workspace(&self) -> Workspace {
        Workspace::new_in(
            &self.temp_root,
            self.package.name(),
            self.package.version(),
        )
    }

    /// Workspace path, allocating the workspace on first use.
    fn ensure_workspace(&mut self) -> Result<PathBuf, BuildError> {
        if let Some(workspace) = &self.workspace {
            return Ok(workspace.path().to_path_buf());
        }
        self.create_temp_dir()
            .map(Path::to_path_buf)
            .map_err(|e| self.fail(e))
    }

    /// Package root, resolved against the directory the session started in.
    fn root_dir(&self) -> PathBuf {
        let root = self.package.root_dir();
        match &self.original_dir {
            Some(dir) if root.is_relative() => dir.join(root),
            _ => root.to_path_buf(),
        }
    }

    fn execute(&mut self, command: &str, cwd: &Path) -> Result<CommandStatus, BuildError> {
        run_command(command, cwd, &mut self.log, self.callback.as_deref_mut())
            .map_err(|e| self.fail(e))
    }

    fn fail(&mut self, error: BuildError) -> BuildError {
        self.stage = Stage::Failed;
        error
    }
}
