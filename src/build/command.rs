//! External command execution
//!
//! Runs one shell command line the way a build script would:
//! ```bash
//! cd <cwd> && /bin/sh -c 'exec 2>&1
//! <command>'
//! ```
//! Standard error is folded into standard output for the whole command line,
//! so every command in a `a; b` or `a && b` line shares the one captured
//! stream and both streams interleave in the order the tools wrote them. The working directory is handed to the
//! child, the calling process never changes its own.

use super::log::{BuildLog, LogLevel};
use super::types::{BuildError, CommandStatus, NO_EXIT_CODE};
use std::fmt;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Command, Stdio};

/// Tag passed to [`OutputCallback::output`] for every command output line
pub const OUTPUT_TAG: &str = "cmdoutput";

/// Debug level a callback is raised to while a command is running
pub const COMMAND_DEBUG_LEVEL: u8 = 2;

/// Receiver for command output
///
/// When a session has a callback, output lines go to it instead of the build
/// log. Callbacks that keep their own verbosity can expose it through
/// `debug_level`; it is raised to [`COMMAND_DEBUG_LEVEL`] for the duration of
/// each command and restored afterward.
pub trait OutputCallback: fmt::Debug {
    /// Called once per output line, with [`OUTPUT_TAG`] and the line text
    /// (line terminator removed).
    fn output(&mut self, tag: &str, line: &str);

    /// Current debug level, if this callback has one
    fn debug_level(&self) -> Option<u8> {
        None
    }

    fn set_debug_level(&mut self, _level: u8) {}
}

/// Run `command` through `/bin/sh` in `cwd`.
///
/// The command line is logged at [`LogLevel::Info`] before anything is read.
/// Output lines go to `callback` when one is given, otherwise to `log` at
/// [`LogLevel::Output`] with trailing whitespace trimmed.
///
/// # Errors
///
/// Returns [`BuildError::Spawn`] if the shell cannot be started (including a
/// missing `cwd`) and [`BuildError::Output`] if reading its output fails. A
/// non-zero exit is not an error; check [`CommandStatus::success`].
pub fn run_command(
    command: &str,
    cwd: &Path,
    log: &mut BuildLog,
    callback: Option<&mut (dyn OutputCallback + '_)>,
) -> Result<CommandStatus, BuildError> {
    log.log(LogLevel::Info, &format!("running: {command}"));

    let mut child = Command::new("/bin/sh")
        .arg("-c")
        .arg(format!("exec 2>&1\n{command}"))
        .current_dir(cwd)
        .stdout(Stdio::piped())
        .spawn()
        .map_err(|source| BuildError::Spawn {
            command: command.to_string(),
            source,
        })?;

    let Some(stdout) = child.stdout.take() else {
        reap(&mut child);
        return Err(BuildError::Spawn {
            command: command.to_string(),
            source: io::Error::other("child stdout was not captured"),
        });
    };

    let drained = match callback {
        Some(callback) => {
            let previous = callback.debug_level();
            if previous.is_some() {
                callback.set_debug_level(COMMAND_DEBUG_LEVEL);
            }
            let drained = drain(stdout, |line| {
                callback.output(OUTPUT_TAG, line.trim_end_matches(['\r', '\n']));
            });
            if let Some(level) = previous {
                callback.set_debug_level(level);
            }
            drained
        }
        None => drain(stdout, |line| log.log(LogLevel::Output, line.trim_end())),
    };

    if let Err(source) = drained {
        reap(&mut child);
        return Err(BuildError::Output {
            command: command.to_string(),
            source,
        });
    }

    let code = match child.wait() {
        Ok(status) => status.code().unwrap_or(NO_EXIT_CODE),
        Err(e) => {
            crate::debug!("Failed to query exit status of {command}: {e}");
            NO_EXIT_CODE
        }
    };
    crate::debug!("{command} exited with {code}");

    Ok(CommandStatus { code })
}

/// Read `output` to EOF, one line at a time. Invalid UTF-8 is replaced rather
/// than treated as an error since compilers happily print raw bytes.
fn drain(output: impl Read, mut on_line: impl FnMut(&str)) -> io::Result<()> {
    let mut reader = BufReader::new(output);
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        on_line(&String::from_utf8_lossy(&buf));
    }
}

fn reap(child: &mut std::process::Child) {
    if let Err(e) = child.wait() {
        crate::debug!("Failed to reap child process: {e}");
    }
}
