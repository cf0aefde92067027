use crate::settings::{AppConfig, error::SettingsError};
use std::{collections::HashMap, str::FromStr};
use tracing::debug;

pub const ENV_MYSQL_HOST: &str = "SQL2DOC_MYSQL_HOST";
pub const ENV_MYSQL_PORT: &str = "SQL2DOC_MYSQL_PORT";
pub const ENV_MYSQL_USER: &str = "SQL2DOC_MYSQL_USER";
pub const ENV_MYSQL_PASSWORD: &str = "SQL2DOC_MYSQL_PASSWORD";
pub const ENV_MYSQL_DATABASE: &str = "SQL2DOC_MYSQL_DATABASE";
pub const ENV_MYSQL_TABLE: &str = "SQL2DOC_MYSQL_TABLE";
pub const ENV_MONGODB_URI: &str = "SQL2DOC_MONGODB_URI";
pub const ENV_MONGODB_DATABASE: &str = "SQL2DOC_MONGODB_DATABASE";
pub const ENV_MONGODB_COLLECTION: &str = "SQL2DOC_MONGODB_COLLECTION";
pub const ENV_BATCH_SIZE: &str = "SQL2DOC_BATCH_SIZE";
pub const ENV_NUM_WORKERS: &str = "SQL2DOC_NUM_WORKERS";
pub const ENV_REPORT_THRESHOLD: &str = "SQL2DOC_REPORT_THRESHOLD";

/// Values given on the command line; they win over files and environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsOverrides {
    pub num_workers: Option<usize>,
    pub batch_size: Option<usize>,
    pub report_threshold: Option<u64>,
}

/// Applies `SQL2DOC_*` variables on top of the file configuration.
pub fn apply_env(config: &mut AppConfig, env: &HashMap<String, String>) -> Result<(), SettingsError> {
    let text = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    if let Some(v) = text(ENV_MYSQL_HOST) {
        config.mysql.host = v;
    }
    if let Some(v) = parsed(env, ENV_MYSQL_PORT)? {
        config.mysql.port = v;
    }
    if let Some(v) = text(ENV_MYSQL_USER) {
        config.mysql.user = v;
    }
    // An empty password is a legitimate override.
    if let Some(v) = env.get(ENV_MYSQL_PASSWORD) {
        config.mysql.password = v.clone();
    }
    if let Some(v) = text(ENV_MYSQL_DATABASE) {
        config.mysql.database = v;
    }
    if let Some(v) = text(ENV_MYSQL_TABLE) {
        config.mysql.table = v;
    }
    if let Some(v) = text(ENV_MONGODB_URI) {
        config.mongodb.uri = v;
    }
    if let Some(v) = text(ENV_MONGODB_DATABASE) {
        config.mongodb.database = v;
    }
    if let Some(v) = text(ENV_MONGODB_COLLECTION) {
        config.mongodb.collection = v;
    }
    if let Some(v) = parsed(env, ENV_BATCH_SIZE)? {
        config.general.batch_size = v;
    }
    if let Some(v) = parsed(env, ENV_NUM_WORKERS)? {
        config.general.num_workers = v;
    }
    if let Some(v) = parsed(env, ENV_REPORT_THRESHOLD)? {
        config.general.report_threshold = v;
    }

    Ok(())
}

pub fn apply_overrides(config: &mut AppConfig, overrides: &SettingsOverrides) {
    if let Some(workers) = overrides.num_workers {
        debug!("Worker count overridden to {workers}");
        config.general.num_workers = workers;
    }
    if let Some(size) = overrides.batch_size {
        debug!("Batch size overridden to {size}");
        config.general.batch_size = size;
    }
    if let Some(threshold) = overrides.report_threshold {
        debug!("Report threshold overridden to {threshold}");
        config.general.report_threshold = threshold;
    }
}

fn parsed<T: FromStr>(env: &HashMap<String, String>, key: &str) -> Result<Option<T>, SettingsError> {
    match env.get(key).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| SettingsError::InvalidEnv {
                key: key.to_string(),
                value: raw.to_string(),
            }),
    }
}
