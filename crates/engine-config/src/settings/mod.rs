use connectors::{mongo::destination::MongoParams, sql::mysql::adapter::MySqlParams};
use model::transform::mapping::FieldMapping;
use serde::{Deserialize, Serialize};

pub mod error;
pub mod loader;
pub mod overrides;
pub mod validator;

pub const DEFAULT_MYSQL_PORT: u16 = 3306;
pub const DEFAULT_BATCH_SIZE: usize = 10_000;
pub const DEFAULT_NUM_WORKERS: usize = 5;
pub const DEFAULT_REPORT_THRESHOLD: u64 = 1_000_000;
pub const DEFAULT_MAX_RECORDS: u64 = 5_000_000;
pub const DEFAULT_ESTIMATED_DOC_SIZE: u64 = 1024;

/// Contents of `config.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub mysql: MySqlSettings,
    pub mongodb: MongoSettings,
    #[serde(default)]
    pub general: GeneralSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MySqlSettings {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub database: String,
    pub table: String,
}

impl MySqlSettings {
    pub fn params(&self) -> MySqlParams {
        MySqlParams {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            database: self.database.clone(),
            table: self.table.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl MongoSettings {
    pub fn params(&self) -> MongoParams {
        MongoParams {
            uri: self.uri.clone(),
            database: self.database.clone(),
            collection: self.collection.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Upper bound for a single bulk insert.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_num_workers")]
    pub num_workers: usize,
    /// Records between two progress lines.
    #[serde(default = "default_report_threshold")]
    pub report_threshold: u64,
    /// Cap on the counted records; `null` or `0` migrates everything.
    #[serde(default = "default_max_records")]
    pub max_records: Option<u64>,
    /// Bytes one document is assumed to take in memory.
    #[serde(default = "default_estimated_doc_size")]
    pub estimated_doc_size: u64,
}

impl GeneralSettings {
    pub fn record_cap(&self) -> Option<u64> {
        self.max_records.filter(|&cap| cap > 0)
    }
}

impl Default for GeneralSettings {
    fn default() -> Self {
        GeneralSettings {
            batch_size: DEFAULT_BATCH_SIZE,
            num_workers: DEFAULT_NUM_WORKERS,
            report_threshold: DEFAULT_REPORT_THRESHOLD,
            max_records: Some(DEFAULT_MAX_RECORDS),
            estimated_doc_size: DEFAULT_ESTIMATED_DOC_SIZE,
        }
    }
}

/// Contents of `mapping.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingFile {
    #[serde(rename = "pessoas")]
    pub people: FieldMapping,
}

/// Everything a run needs, loaded and validated.
#[derive(Debug, Clone, PartialEq)]
pub struct MigrationSettings {
    pub config: AppConfig,
    pub mapping: FieldMapping,
}

fn default_port() -> u16 {
    DEFAULT_MYSQL_PORT
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_num_workers() -> usize {
    DEFAULT_NUM_WORKERS
}

fn default_report_threshold() -> u64 {
    DEFAULT_REPORT_THRESHOLD
}

fn default_max_records() -> Option<u64> {
    Some(DEFAULT_MAX_RECORDS)
}

fn default_estimated_doc_size() -> u64 {
    DEFAULT_ESTIMATED_DOC_SIZE
}
