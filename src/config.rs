//! Application configuration.
//!
//! Everything has a built-in default. An optional JSON file (path from
//! `MACRO_MAP_CONFIG`, default `macro-map.json`) can override the data file
//! and the country groups offered in the side panel, and `MACRO_MAP_DATA`
//! overrides the data file last.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::model::MacroDataset;
use crate::error::ConfigError;

pub const DEFAULT_DATA_FILE: &str = "donnees_macro_1980-2029_filtrees.xlsx";
pub const DEFAULT_CONFIG_FILE: &str = "macro-map.json";
pub const CONFIG_ENV: &str = "MACRO_MAP_CONFIG";
pub const DATA_ENV: &str = "MACRO_MAP_DATA";

const G7: [&str; 7] = [
    "Canada",
    "France",
    "Germany",
    "Italy",
    "Japan",
    "United Kingdom",
    "United States",
];

// ---------------------------------------------------------------------------
// Country groups
// ---------------------------------------------------------------------------

/// A named set of countries. Without `members` the group spans every
/// country in the dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryGroup {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<String>>,
}

/// Ordered table of groups, keyed by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryGroups(Vec<CountryGroup>);

impl Default for CountryGroups {
    fn default() -> Self {
        CountryGroups::new(vec![
            CountryGroup {
                name: "All countries".to_string(),
                members: None,
            },
            CountryGroup {
                name: "G7".to_string(),
                members: Some(G7.iter().map(|c| c.to_string()).collect()),
            },
        ])
    }
}

impl CountryGroups {
    pub fn new(groups: Vec<CountryGroup>) -> Self {
        CountryGroups(groups)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|g| g.name.as_str())
    }

    pub fn first_name(&self) -> Option<&str> {
        self.0.first().map(|g| g.name.as_str())
    }

    /// Members of the named group. Unknown groups have no members.
    pub fn members(&self, name: &str, dataset: &MacroDataset) -> Vec<String> {
        match self.0.iter().find(|g| g.name == name) {
            Some(CountryGroup {
                members: Some(list),
                ..
            }) => list.clone(),
            Some(CountryGroup { members: None, .. }) => {
                dataset.countries.iter().cloned().collect()
            }
            None => Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,
    #[serde(default)]
    pub country_groups: CountryGroups,
}

fn default_data_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATA_FILE)
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_path: default_data_path(),
            country_groups: CountryGroups::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file. Absent fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the runtime configuration from the environment. Never fails:
    /// a missing config file means defaults, a broken one is logged and
    /// ignored.
    pub fn resolve() -> Self {
        let config_path = std::env::var_os(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let data_override = std::env::var_os(DATA_ENV).map(PathBuf::from);
        Self::resolve_from(&config_path, data_override)
    }

    fn resolve_from(config_path: &Path, data_override: Option<PathBuf>) -> Self {
        let mut config = if config_path.exists() {
            match Self::load(config_path) {
                Ok(config) => {
                    log::info!("Using config {}", config_path.display());
                    config
                }
                Err(e) => {
                    log::warn!("{e}; using defaults");
                    Self::default()
                }
            }
        } else {
            Self::default()
        };

        if let Some(path) = data_override {
            config.data_path = path;
        }
        config
    }
}
