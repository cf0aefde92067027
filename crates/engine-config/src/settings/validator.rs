use crate::settings::{AppConfig, error::SettingsError};
use connectors::sql::is_safe_table_name;
use model::transform::mapping::FieldMapping;
use tracing::{info, warn};

/// Batches above this size are allowed but usually hurt more than they help.
const LARGE_BATCH_WARNING: usize = 100_000;

/// Checks a fully merged configuration before anything connects.
pub struct SettingsValidator<'a> {
    config: &'a AppConfig,
    mapping: &'a FieldMapping,
}

impl<'a> SettingsValidator<'a> {
    pub fn new(config: &'a AppConfig, mapping: &'a FieldMapping) -> Self {
        Self { config, mapping }
    }

    /// Collects every problem and reports them together.
    pub fn validate(&self) -> Result<(), SettingsError> {
        let mut errors: Vec<String> = Vec::new();

        self.validate_general(&mut errors);
        self.validate_mysql(&mut errors);
        self.validate_mongodb(&mut errors);
        self.validate_mapping(&mut errors);

        if !errors.is_empty() {
            return Err(SettingsError::ValidationFailed(errors));
        }

        info!(
            "Settings validated: {} workers, batch size up to {}, progress every {} records",
            self.config.general.num_workers,
            self.config.general.batch_size,
            self.config.general.report_threshold
        );
        Ok(())
    }

    fn validate_general(&self, errors: &mut Vec<String>) {
        let general = &self.config.general;
        if general.num_workers == 0 {
            errors.push("num_workers must be at least 1".to_string());
        }
        if general.batch_size == 0 {
            errors.push("batch_size must be at least 1".to_string());
        } else if general.batch_size > LARGE_BATCH_WARNING {
            warn!(
                "Batch size {} is very large, may cause memory issues",
                general.batch_size
            );
        }
        if general.report_threshold == 0 {
            errors.push("report_threshold must be at least 1".to_string());
        }
        if general.estimated_doc_size == 0 {
            errors.push("estimated_doc_size must be at least 1".to_string());
        }
    }

    fn validate_mysql(&self, errors: &mut Vec<String>) {
        let mysql = &self.config.mysql;
        require(errors, "mysql.host", &mysql.host);
        require(errors, "mysql.user", &mysql.user);
        require(errors, "mysql.database", &mysql.database);
        if mysql.table.is_empty() {
            errors.push("mysql.table must not be empty".to_string());
        } else if !is_safe_table_name(&mysql.table) {
            errors.push(format!(
                "mysql.table '{}' may only contain letters, digits, '_', '$' and '.'",
                mysql.table
            ));
        }
    }

    fn validate_mongodb(&self, errors: &mut Vec<String>) {
        let mongodb = &self.config.mongodb;
        require(errors, "mongodb.uri", &mongodb.uri);
        require(errors, "mongodb.database", &mongodb.database);
        require(errors, "mongodb.collection", &mongodb.collection);
    }

    fn validate_mapping(&self, errors: &mut Vec<String>) {
        if let Err(e) = self.mapping.validate() {
            errors.push(e.to_string());
        }
    }
}

fn require(errors: &mut Vec<String>, name: &str, value: &str) {
    if value.trim().is_empty() {
        errors.push(format!("{name} must not be empty"));
    }
}
