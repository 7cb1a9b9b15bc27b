use crate::{codec::LoadOptions, error::WnError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::{
    fs::{read_to_string, write},
    path::PathBuf,
};

/// Console settings. The library itself takes explicit options; only the `wnquery` binary reads
/// these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Add inverse relation edges while loading.
    pub invert_relations: bool,
    /// Depth bound applied to `.ti`/`.tl` when the command gives none.
    pub max_depth: Option<usize>,
    pub prompt: String,
    /// Where the line editor keeps its history, if it keeps one.
    pub history_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            invert_relations: true,
            max_depth: None,
            prompt: ">".to_string(),
            history_file: None,
        }
    }
}

impl Settings {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            invert_relations: self.invert_relations,
        }
    }
}

pub trait ConfigProvider {
    fn get_settings(&self) -> Result<Settings, WnError>;
    fn set_settings(&self, settings: &Settings) -> Result<(), WnError>;
}

/// Keeps [Settings] in the `[settings]` table of a TOML file.
#[derive(Debug, Serialize, Deserialize)]
pub struct TomlConfigProvider {
    path: PathBuf,
}

impl TomlConfigProvider {
    pub fn new(path: PathBuf) -> Self {
        TomlConfigProvider { path }
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_settings(&self) -> Result<Settings, WnError> {
        tracing::debug!("Attempting to read settings from: {:?}", &self.path);
        if !self.path.exists() {
            tracing::debug!("Config file not found, using default settings.");
            return Ok(Settings::default());
        }
        let content = read_to_string(&self.path)?;
        let mut config: BTreeMap<String, Settings> = toml::from_str(&content)?;
        config
            .remove("settings")
            .ok_or_else(|| WnError::Config("settings not found in config".to_string()))
    }

    fn set_settings(&self, settings: &Settings) -> Result<(), WnError> {
        tracing::debug!("Attempting to write settings to: {:?}", &self.path);
        let mut config = BTreeMap::new();
        config.insert("settings".to_string(), settings);
        let toml_string = toml::to_string(&config)?;
        write(&self.path, toml_string)?;
        Ok(())
    }
}
