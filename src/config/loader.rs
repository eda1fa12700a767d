//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading engine
//! settings and the roster template from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};
use crate::models::{DeductionPolicy, RosterTemplate};
use crate::store::SettingsReader;

use super::roster::normalize_roster;
use super::types::{EngineSettings, RosterSettings};

/// Loads and provides access to engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── engine.yaml   # Rounding and default deduction policy
/// └── roster.yaml   # Working day and break windows
/// ```
///
/// # Example
///
/// ```no_run
/// use leave_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Rounding to {} minutes", loader.settings().calculation.rounding_minutes);
/// # Ok::<(), leave_engine::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    settings: EngineSettings,
    roster: RosterSettings,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Either file is missing (`ConfigNotFound`)
    /// - Either file contains invalid YAML (`ConfigParseError`)
    /// - The roster is malformed (`InvalidRoster`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings = Self::load_yaml::<EngineSettings>(&path.join("engine.yaml"))?;
        let roster = Self::load_yaml::<RosterSettings>(&path.join("roster.yaml"))?;

        Self::new(settings, roster)
    }

    /// Builds a loader from YAML documents already in memory.
    pub fn from_yaml_strs(engine_yaml: &str, roster_yaml: &str) -> EngineResult<Self> {
        let settings = Self::parse_yaml::<EngineSettings>(engine_yaml, "engine.yaml")?;
        let roster = Self::parse_yaml::<RosterSettings>(roster_yaml, "roster.yaml")?;

        Self::new(settings, roster)
    }

    /// Builds a loader from parsed settings, validating the roster eagerly.
    pub fn new(settings: EngineSettings, roster: RosterSettings) -> EngineResult<Self> {
        normalize_roster(&roster)?;
        Ok(Self { settings, roster })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        Self::parse_yaml(&content, &path_str)
    }

    fn parse_yaml<T: serde::de::DeserializeOwned>(content: &str, path: &str) -> EngineResult<T> {
        serde_yaml::from_str(content).map_err(|e| EngineError::ConfigParseError {
            path: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Returns the engine settings.
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    /// Returns the normalized roster template.
    pub fn roster(&self) -> EngineResult<RosterTemplate> {
        normalize_roster(&self.roster)
    }

    /// Returns the configured default deduction policy.
    pub fn deduction_policy(&self) -> &DeductionPolicy {
        &self.settings.deduction_policy
    }
}

impl SettingsReader for ConfigLoader {
    fn roster_settings(&self) -> EngineResult<RosterSettings> {
        Ok(self.roster.clone())
    }

    fn rounding_minutes(&self) -> EngineResult<u32> {
        Ok(self.settings.calculation.rounding_minutes)
    }
}
