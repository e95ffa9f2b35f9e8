//! Operator settings read from a TOML file.
//!
//! ```toml
//! catalog_root = "/usr/share/regscope/descriptions"
//! highlight = true
//! field_overflow = "reject"
//! default_flags = "/o"
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::loader::LoadError;
use crate::soc::codec::OverflowPolicy;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Root of the `<vendor>/<file>` description catalog.
    pub catalog_root: PathBuf,
    /// Emphasise nonzero field values.
    pub highlight: bool,
    pub field_overflow: OverflowPolicy,
    /// Flag token used when a command carries none.
    pub default_flags: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog_root: PathBuf::from("descriptions"),
            highlight: false,
            field_overflow: OverflowPolicy::Truncate,
            default_flags: None,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
