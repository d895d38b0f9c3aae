//! Pickle command-line interface
//!
//! Builds and installs PHP extensions from source

use clap::{Parser, Subcommand};
use pickle::Config;
use std::process;

/// Display an error with optional backtrace information
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    eprintln!("error: {err}");

    // Show error chain
    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

/// Parse `NAME=on|off` (or a bare `NAME`, meaning on) into an option override
fn parse_option_override(value: &str) -> Result<(String, bool), String> {
    let (name, answer) = value.split_once('=').unwrap_or((value, "on"));
    if name.is_empty() {
        return Err(format!("missing option name in {value:?}"));
    }

    let enabled = match answer.to_lowercase().as_str() {
        "on" | "yes" | "true" | "1" => true,
        "off" | "no" | "false" | "0" => false,
        other => return Err(format!("expected on/off for {name}, got {other:?}")),
    };
    Ok((name.to_string(), enabled))
}

#[derive(Parser)]
#[command(name = "pickle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "A PHP extension builder", long_about = None)]
pub(crate) struct Cli {
    /// Print debug output to stderr
    #[arg(long, global = true)]
    debug: bool,

    /// Show stack backtrace on errors
    #[arg(long, global = true)]
    backtrace: bool,

    /// Config file path (overrides default)
    #[arg(long, global = true)]
    config_file: Option<String>,

    /// Avoid loading any .pickle.toml file
    #[arg(long, global = true)]
    norc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build and install an extension from its source tree
    ///
    /// Runs phpize in the source tree, then configure, make and make install
    /// in a temporary workspace.
    Build {
        /// Extension source directory containing composer.json
        #[arg(default_value = ".")]
        dir: String,

        /// Set a configure option, e.g. `--option apcu-debug=on`
        #[arg(long = "option", short = 'o', value_parser = parse_option_override)]
        options: Vec<(String, bool)>,

        /// Leave the workspace in place after building
        #[arg(long)]
        keep_workspace: bool,

        /// Stream command output while building
        #[arg(long, short = 'v')]
        verbose: bool,

        /// Write the build log to this file
        #[arg(long)]
        log_file: Option<String>,
    },

    /// Remove the build workspace of an extension
    Clean {
        /// Extension source directory containing composer.json
        #[arg(default_value = ".")]
        dir: String,
    },

    /// List the configure options an extension declares
    Options {
        /// Extension source directory containing composer.json
        #[arg(default_value = ".")]
        dir: String,
    },
}

fn main() {
    let cli = Cli::parse();

    pickle::init_debug(cli.debug);

    let result = Config::load_with_options(cli.config_file.as_deref(), cli.norc).and_then(
        |config| match cli.command {
            Commands::Build {
                dir,
                options,
                keep_workspace,
                verbose,
                log_file,
            } => commands::build::run(
                &commands::build::BuildArgs {
                    dir,
                    overrides: options.into_iter().collect(),
                    keep_workspace: keep_workspace
                        || config.keep_workspace
                        || pickle::env_vars::keep_workspace(),
                    verbose: verbose || config.verbose,
                    log_file,
                },
                &config,
            ),
            Commands::Clean { dir } => commands::clean::run(&dir, &config),
            Commands::Options { dir } => commands::options::run(&dir),
        },
    );

    if let Err(e) = result {
        display_error(&e, cli.backtrace);
        process::exit(1);
    }
}

mod commands;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_option_overrides() {
        assert_eq!(
            parse_option_override("apcu-debug=on"),
            Ok(("apcu-debug".to_string(), true))
        );
        assert_eq!(
            parse_option_override("apcu-mmap=NO"),
            Ok(("apcu-mmap".to_string(), false))
        );
        assert_eq!(
            parse_option_override("apcu-debug"),
            Ok(("apcu-debug".to_string(), true))
        );
    }

    #[test]
    fn rejects_bad_option_overrides() {
        assert!(parse_option_override("=on").is_err());
        assert!(parse_option_override("apcu-debug=maybe").is_err());
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
