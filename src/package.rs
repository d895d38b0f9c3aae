//! PHP extension package metadata
//!
//! Reads the identity and declared configure options of an extension from the
//! `composer.json` in its source tree:
//! ```json
//! {
//!   "name": "krakjoe/apcu",
//!   "version": "5.1.23",
//!   "extra": {
//!     "configure-options": [
//!       { "name": "apcu", "type": "enable", "default": true, "prompt": "Enable APCu" },
//!       { "name": "apcu-debug", "type": "enable", "default": false }
//!     ]
//!   }
//! }
//! ```

use crate::build::ConfigureOption;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the package manifest
pub const MANIFEST_FILE: &str = "composer.json";

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to read package manifest at {}: {source}", path.display())]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse package manifest at {}: {source}", path.display())]
    ParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Package manifest at {} has no version", path.display())]
    MissingVersion { path: PathBuf },

    #[error("Invalid name {name:?}: only letters, digits, '_' and '-' are allowed")]
    InvalidName { name: String },

    #[error("Package {package} has no configure option named {name}")]
    UnknownOption { package: String, name: String },
}

#[derive(Debug, Deserialize)]
struct Manifest {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    extra: Extra,
}

#[derive(Debug, Default, Deserialize)]
struct Extra {
    #[serde(rename = "configure-options", default)]
    configure_options: Vec<ConfigureOption>,
}

/// A PHP extension source package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    version: String,
    root_dir: PathBuf,
    configure_options: Vec<ConfigureOption>,
}

impl Package {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        root_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            root_dir: root_dir.into(),
            configure_options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_configure_options(mut self, options: Vec<ConfigureOption>) -> Self {
        self.configure_options = options;
        self
    }

    /// Extension name (the part of the composer name after the vendor)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Source tree containing `config.m4` and, after phpize, `configure`
    #[must_use]
    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Declared options, in declaration order
    #[must_use]
    pub fn configure_options(&self) -> &[ConfigureOption] {
        &self.configure_options
    }

    /// Load the package whose source tree is `dir`.
    pub fn from_manifest(dir: impl AsRef<Path>) -> Result<Self, PackageError> {
        let dir = dir.as_ref();
        let root_dir = dir.canonicalize().map_err(|source| PackageError::ReadError {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = root_dir.join(MANIFEST_FILE);
        let contents = fs::read_to_string(&path).map_err(|source| PackageError::ReadError {
            path: path.clone(),
            source,
        })?;

        Self::parse_manifest(&contents, &path, root_dir)
    }

    /// Parse manifest `contents` (read from `path`) for a package rooted at
    /// `root_dir`.
    pub fn parse_manifest(
        contents: &str,
        path: &Path,
        root_dir: PathBuf,
    ) -> Result<Self, PackageError> {
        let manifest: Manifest =
            serde_json::from_str(contents).map_err(|source| PackageError::ParseError {
                path: path.to_path_buf(),
                source,
            })?;

        let name = manifest
            .name
            .rsplit('/')
            .next()
            .unwrap_or(&manifest.name)
            .to_string();
        validate_name(&name)?;

        let version = manifest
            .version
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| PackageError::MissingVersion {
                path: path.to_path_buf(),
            })?;
        validate_name(&version.replace('.', ""))?;

        let mut options = manifest.extra.configure_options;
        for option in &mut options {
            validate_name(&option.name)?;
            option.input = option.default;
        }

        Ok(Self {
            name,
            version,
            root_dir,
            configure_options: options,
        })
    }

    /// Options to pass to `configure` besides the primary flag.
    ///
    /// Every declared option except the extension's own, in declaration order,
    /// with `input` taken from `overrides` or else the declared default.
    pub fn session_options(
        &self,
        overrides: &HashMap<String, bool>,
    ) -> Result<Vec<ConfigureOption>, PackageError> {
        if let Some(unknown) = overrides
            .keys()
            .find(|name| !self.configure_options.iter().any(|o| &o.name == *name))
        {
            return Err(PackageError::UnknownOption {
                package: self.name.clone(),
                name: unknown.clone(),
            });
        }

        Ok(self
            .configure_options
            .iter()
            .filter(|option| option.name != self.name)
            .map(|option| ConfigureOption {
                input: overrides
                    .get(&option.name)
                    .copied()
                    .unwrap_or(option.default),
                ..option.clone()
            })
            .collect())
    }
}

/// Names end up in directory names and shell command lines.
fn validate_name(name: &str) -> Result<(), PackageError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');

    if valid {
        Ok(())
    } else {
        Err(PackageError::InvalidName {
            name: name.to_string(),
        })
    }
}
