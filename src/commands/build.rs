//! Build command
//!
//! Build and install an extension from its source tree

use anyhow::{Context, Result};
use pickle::{BuildSession, Config, InstallOutcome, OutputCallback, Package};
use std::collections::HashMap;
use std::fs;

/// Flags for `pickle build`, merged with config and environment
#[derive(Debug)]
pub(crate) struct BuildArgs {
    pub(crate) dir: String,
    pub(crate) overrides: HashMap<String, bool>,
    pub(crate) keep_workspace: bool,
    pub(crate) verbose: bool,
    pub(crate) log_file: Option<String>,
}

/// Prints command output as it arrives
#[derive(Debug)]
struct ConsoleOutput;

impl OutputCallback for ConsoleOutput {
    fn output(&mut self, _tag: &str, line: &str) {
        println!("  {line}");
    }
}

pub(crate) fn run(args: &BuildArgs, config: &Config) -> Result<()> {
    let package = Package::from_manifest(&args.dir)
        .with_context(|| format!("Failed to load extension in {}", args.dir))?;
    let options = package.session_options(&args.overrides)?;

    println!("Building {} {}...", package.name(), package.version());

    let mut session = BuildSession::new(&package, options)
        .with_temp_root(config.temp_root())
        .with_toolchain(config.toolchain());
    if args.verbose {
        session = session.with_callback(Box::new(ConsoleOutput));
    }
    pickle::debug!("configure: {}", session.configure_command()?);

    let result = session.run();

    if let Some(path) = &args.log_file {
        fs::write(path, session.log().as_str())
            .with_context(|| format!("Failed to write build log to {path}"))?;
    }

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            if !args.verbose && !session.log().is_empty() {
                eprintln!("{}", session.log());
            }
            if args.keep_workspace {
                eprintln!("Workspace kept at {}", session.workspace_path().display());
            } else if let Err(cleanup) = session.cleanup() {
                pickle::debug!("Failed to remove workspace: {cleanup}");
            }
            return Err(e).with_context(|| {
                format!(
                    "Failed to build {} {} ({})",
                    package.name(),
                    package.version(),
                    session.stage().description()
                )
            });
        }
    };

    if let InstallOutcome::FailedIgnored { code } = report.install {
        eprintln!("warning: make install exited with code {code}; continuing");
    }

    if args.keep_workspace {
        println!("Workspace kept at {}", report.workspace.display());
    } else {
        session.cleanup()?;
    }

    println!(
        "Built {} {} in {:.2}s",
        report.name,
        report.version,
        report.duration.as_secs_f64()
    );
    Ok(())
}
