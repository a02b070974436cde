//! Converter options.
//!
//! Options can be built in code or loaded from YAML:
//!
//! ```yaml
//! selector_title: "Pick a subcommand"
//! ```
//!
//! Missing fields fall back to their defaults.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Title of the selector form entry emitted for each subcommand group.
pub const DEFAULT_SELECTOR_TITLE: &str = "Choose command";

/// Settings that shape the generated form.
///
/// # Examples
///
/// ```
/// use argform_core::ConvertOptions;
///
/// let options = ConvertOptions::from_yaml_str("selector_title: Pick one\n").unwrap();
/// assert_eq!(options.selector_title, "Pick one");
///
/// let defaults = ConvertOptions::from_yaml_str("{}").unwrap();
/// assert_eq!(defaults, ConvertOptions::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvertOptions {
    /// Title of every `selectfieldset` form entry.
    pub selector_title: String,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            selector_title: DEFAULT_SELECTOR_TITLE.to_string(),
        }
    }
}

impl ConvertOptions {
    /// Parses options from a YAML string.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Loads options from a YAML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let options: Self = serde_yaml::from_reader(reader)?;
        Ok(options)
    }

    /// Writes options to a YAML file.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }
}
