//! Build workspace
//!
//! Extensions are configured and compiled out of tree, in a directory named
//! after the package under the temp root:
//! ```text
//! <temp-root>/pickle-<name><version>/
//! ```
//! The name is deterministic, so a directory left behind by an aborted build
//! is found and wiped before the next build of the same version.

use super::types::BuildError;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Prefix of every workspace directory name
pub const WORKSPACE_PREFIX: &str = "pickle-";

/// Temporary build directory owned by one build session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    path: PathBuf,
}

impl Workspace {
    /// Workspace for `name` + `version` under the system temp directory.
    #[must_use]
    pub fn new(name: &str, version: &str) -> Self {
        Self::new_in(std::env::temp_dir(), name, version)
    }

    /// Workspace for `name` + `version` under `temp_root`.
    #[must_use]
    pub fn new_in(temp_root: impl AsRef<Path>, name: &str, version: &str) -> Self {
        Self {
            path: temp_root
                .as_ref()
                .join(format!("{WORKSPACE_PREFIX}{name}{version}")),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether anything occupies the workspace path. A symlink counts, even a
    /// dangling one.
    #[must_use]
    pub fn exists(&self) -> bool {
        fs::symlink_metadata(&self.path).is_ok()
    }

    /// Create a fresh, empty workspace directory.
    ///
    /// A stale directory from a previous run is removed first.
    pub fn allocate(&self) -> Result<(), BuildError> {
        if self.exists() {
            crate::debug!("Removing stale workspace {}", self.path.display());
            self.release()?;
        }

        fs::create_dir(&self.path).map_err(|source| self.error(source))
    }

    /// Remove the workspace and everything in it.
    ///
    /// Entries are removed children first. Symlinks are unlinked, never
    /// followed, including a symlink sitting at the workspace path itself. A
    /// missing workspace is not an error, so calling this twice is fine.
    pub fn release(&self) -> Result<(), BuildError> {
        let metadata = match fs::symlink_metadata(&self.path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(self.error(e)),
        };

        if !metadata.is_dir() {
            fs::remove_file(&self.path).map_err(|source| self.error(source))?;
            crate::debug!("unlink: {}", self.path.display());
            return Ok(());
        }

        for entry in WalkDir::new(&self.path)
            .min_depth(1)
            .contents_first(true)
            .follow_links(false)
            .follow_root_links(false)
        {
            let entry = entry.map_err(|e| {
                let path = e
                    .path()
                    .map_or_else(|| self.path.clone(), Path::to_path_buf);
                BuildError::Workspace {
                    path,
                    source: io::Error::other(e),
                }
            })?;
            let path = entry.path();

            let removed = if entry.file_type().is_dir() {
                fs::remove_dir(path)
            } else {
                fs::remove_file(path)
            };
            removed.map_err(|source| BuildError::Workspace {
                path: path.to_path_buf(),
                source,
            })?;
            crate::debug!("rmdir: {}", path.display());
        }

        fs::remove_dir(&self.path).map_err(|source| self.error(source))?;
        crate::debug!("rmdir: {}", self.path.display());
        Ok(())
    }

    fn error(&self, source: io::Error) -> BuildError {
        BuildError::Workspace {
            path: self.path.clone(),
            source,
        }
    }
}
