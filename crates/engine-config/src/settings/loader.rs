use crate::settings::{
    AppConfig, MappingFile, MigrationSettings,
    error::SettingsError,
    overrides::{SettingsOverrides, apply_env, apply_overrides},
    validator::SettingsValidator,
};
use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tracing::info;

pub const CONFIG_FILE: &str = "config.json";
pub const MAPPING_FILE: &str = "mapping.json";

/// Reads `config.json` and `mapping.json` from one directory.
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    dir: PathBuf,
}

impl SettingsLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        SettingsLoader { dir: dir.into() }
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.dir.join(MAPPING_FILE)
    }

    /// Files, then environment, then command-line overrides, then validation.
    pub fn load(
        &self,
        env: &HashMap<String, String>,
        overrides: &SettingsOverrides,
    ) -> Result<MigrationSettings, SettingsError> {
        let mut config: AppConfig = read_json(&self.config_path())?;
        let mapping: MappingFile = read_json(&self.mapping_path())?;

        apply_env(&mut config, env)?;
        apply_overrides(&mut config, overrides);

        SettingsValidator::new(&config, &mapping.people).validate()?;

        info!(
            "Loaded settings from '{}' (source table '{}', destination '{}.{}')",
            self.dir.display(),
            config.mysql.table,
            config.mongodb.database,
            config.mongodb.collection
        );

        Ok(MigrationSettings {
            config,
            mapping: mapping.people,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, SettingsError> {
    let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
