//! Configure option resolution
//!
//! Turns declared extension options into `configure` flags:
//! ```bash
//! <root>/configure --enable-apcu=shared --enable-apcu-debug --disable-apcu-mmap
//! ```

use super::types::BuildError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How an option's declared type maps user input to a flag direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// `"enable"`: the feature is turned on when the user answers yes
    EnableByDefault,
    /// `"disable"`: the feature is turned on when the user answers no
    DisableByDefault,
}

impl OptionKind {
    /// Direction (`enable` or `disable`) for the given user input
    #[must_use]
    pub const fn direction(self, input: bool) -> &'static str {
        match (self, input) {
            (Self::EnableByDefault, true) | (Self::DisableByDefault, false) => "enable",
            (Self::EnableByDefault, false) | (Self::DisableByDefault, true) => "disable",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnableByDefault => "enable",
            Self::DisableByDefault => "disable",
        }
    }
}

impl FromStr for OptionKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enable" => Ok(Self::EnableByDefault),
            "disable" => Ok(Self::DisableByDefault),
            _ => Err(()),
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named boolean toggle passed to `configure`
///
/// The declared type is kept verbatim so a malformed package is reported when
/// its flags are assembled, naming the offending option.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConfigureOption {
    pub name: String,

    /// Declared type, `"enable"` or `"disable"`
    #[serde(rename = "type")]
    pub kind: String,

    /// Whether the user asked for this option
    #[serde(default, skip_serializing)]
    pub input: bool,

    /// Declared default answer
    #[serde(default)]
    pub default: bool,

    /// Question shown to the user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
}

impl ConfigureOption {
    #[must_use]
    pub fn new(name: impl Into<String>, kind: OptionKind, input: bool) -> Self {
        Self {
            name: name.into(),
            kind: kind.as_str().to_string(),
            input,
            default: false,
            prompt: None,
        }
    }

    /// Parsed option type.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidOption`] for any type other than `enable`
    /// or `disable`.
    pub fn kind(&self) -> Result<OptionKind, BuildError> {
        self.kind.parse::<OptionKind>().map_err(|()| BuildError::InvalidOption {
            name: self.name.clone(),
            kind: self.kind.clone(),
        })
    }

    /// The `--enable-<name>` / `--disable-<name>` flag for this option.
    pub fn flag(&self) -> Result<String, BuildError> {
        let direction = self.kind()?.direction(self.input);
        Ok(format!("--{direction}-{}", self.name))
    }
}

/// Flags for every option, in declaration order.
///
/// Fails on the first malformed option; nothing is partially returned.
pub fn configure_flags(options: &[ConfigureOption]) -> Result<Vec<String>, BuildError> {
    options.iter().map(ConfigureOption::flag).collect()
}

/// The flag that activates the extension itself.
///
/// `--enable-<name>=shared` when the extension's own option is declared as
/// `enable`, otherwise `--with-<name>=shared` (including when the package
/// declares no option for itself).
///
/// # Errors
///
/// Returns [`BuildError::InvalidOption`] if the extension's own option is
/// declared with an unknown type.
pub fn primary_flag(name: &str, declared: &[ConfigureOption]) -> Result<String, BuildError> {
    let own = declared
        .iter()
        .find(|option| option.name == name)
        .map(ConfigureOption::kind)
        .transpose()?;

    Ok(match own {
        Some(OptionKind::EnableByDefault) => format!("--enable-{name}=shared"),
        Some(OptionKind::DisableByDefault) | None => format!("--with-{name}=shared"),
    })
}

/// Argument string for `configure`: the primary flag, a space, then the
/// remaining flags separated by spaces.
#[must_use]
pub fn configure_arguments(primary: &str, flags: &[String]) -> String {
    format!("{primary} {}", flags.join(" "))
}
