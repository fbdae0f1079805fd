//! Runtime configuration from an optional `vanshavali.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::gender::NameHeuristic;
use crate::persist::FileStore;
use crate::phrases::Language;

pub const DEFAULT_CONFIG_FILE: &str = "vanshavali.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base record list: JSON array or exported snippet.
    pub data_file: PathBuf,
    /// Saved edits; overrides `data_file` while it exists.
    pub edits_file: PathBuf,
    pub language: Language,
    pub gender: GenderConfig,
}

/// Extra entries for the default gender heuristic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenderConfig {
    /// Whole first names, matched exactly.
    pub female_names: Vec<String>,
    /// Substrings: `"preet"` also marks "Harpreeti" as male.
    pub male_fragments: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from("data.js"),
            edits_file: PathBuf::from("family_edits.json"),
            language: Language::default(),
            gender: GenderConfig::default(),
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path` if given (it must exist), else `vanshavali.toml` in the
    /// working directory if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => Path::new(DEFAULT_CONFIG_FILE),
            None => {
                debug!("no config file, using defaults");
                return Ok(Config::default());
            }
        };
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml(&text)?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn classifier(&self) -> NameHeuristic {
        NameHeuristic::with_extra(&self.gender.female_names, &self.gender.male_fragments)
    }

    pub fn store(&self) -> FileStore {
        FileStore::new(&self.data_file, &self.edits_file)
    }
}
