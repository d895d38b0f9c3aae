//! Configuration file management
//!
//! Handles reading pickle's TOML configuration files from project and global
//! locations, and layering environment overrides on top.

use crate::build::Toolchain;
use crate::env_vars;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Application configuration loaded from TOML files
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Root directory for build workspaces (defaults to the system temp dir)
    #[serde(default)]
    pub tmp_dir: Option<String>,

    /// Leave the workspace in place after a build
    #[serde(default)]
    pub keep_workspace: bool,

    /// Stream command output while building
    #[serde(default)]
    pub verbose: bool,

    /// Build tool overrides
    #[serde(default)]
    pub toolchain: ToolchainConfig,
}

/// `[toolchain]` table
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ToolchainConfig {
    /// Command used in place of `phpize`
    #[serde(default)]
    pub phpize: Option<String>,

    /// Command used in place of `make`
    #[serde(default)]
    pub make: Option<String>,
}

impl Config {
    /// Load configuration from TOML files.
    /// Priority: `PICKLE_CONFIG` -> ./.pickle.toml -> ~/.config/pickle/config.toml
    ///
    /// # Errors
    ///
    /// Returns an error if config file parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_with_options(None, false)
    }

    /// Load configuration with custom options.
    ///
    /// # Arguments
    /// * `custom_path` - Optional custom path to config file (overrides defaults)
    /// * `skip_rc` - If true, skip loading config files (return default config)
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested config file cannot be read,
    /// or if any config file that exists fails to parse.
    pub fn load_with_options(custom_path: Option<&str>, skip_rc: bool) -> Result<Self> {
        if skip_rc {
            return Ok(Self::default());
        }

        if let Some(path) = custom_path
            .map(ToString::to_string)
            .or_else(env_vars::pickle_config)
        {
            return Self::load_from(&path)
                .with_context(|| format!("Failed to load config file: {path}"));
        }

        let local = Path::new(".pickle.toml");
        if local.exists() {
            return Self::load_from(local).context("Failed to load .pickle.toml");
        }

        if let Some(config_dir) = Self::user_config_dir() {
            let config_path = config_dir.join("config.toml");
            if config_path.exists() {
                return Self::load_from(&config_path).with_context(|| {
                    format!("Failed to load config file: {}", config_path.display())
                });
            }
        }

        Ok(Self::default())
    }

    /// Parse configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or has unexpected types.
    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid pickle configuration")
    }

    fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    fn user_config_dir() -> Option<PathBuf> {
        // Check XDG_CONFIG_HOME first
        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg_config).join("pickle"));
        }

        // Fall back to ~/.config/pickle
        dirs::home_dir().map(|home| home.join(".config").join("pickle"))
    }

    /// Root directory for workspaces.
    /// Priority: `PICKLE_TMPDIR` -> `tmp_dir` -> system temp dir.
    #[must_use]
    pub fn temp_root(&self) -> PathBuf {
        env_vars::pickle_tmpdir()
            .or_else(|| self.tmp_dir.as_ref().map(PathBuf::from))
            .unwrap_or_else(env::temp_dir)
    }

    /// Build tools to invoke.
    /// Priority: `PHPIZE`/`MAKE` -> `[toolchain]` -> `phpize`/`make`.
    #[must_use]
    pub fn toolchain(&self) -> Toolchain {
        let defaults = Toolchain::default();
        Toolchain {
            phpize: env_vars::phpize_command()
                .or_else(|| self.toolchain.phpize.clone())
                .unwrap_or(defaults.phpize),
            make: env_vars::make_command()
                .or_else(|| self.toolchain.make.clone())
                .unwrap_or(defaults.make),
        }
    }
}
