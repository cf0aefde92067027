use crate::error::CliError;
use engine_runtime::execution::summary::MigrationSummary;
use model::pagination::range::WorkRange;
use serde::Serialize;
use std::path::Path;

/// What `plan` prints.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    pub table: String,
    pub total_records: u64,
    pub record_cap: Option<u64>,
    pub workers: usize,
    pub batch_size: usize,
    pub ranges: Vec<WorkRange>,
}

fn to_json<T: Serialize>(value: &T) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub async fn write_summary(summary: &MigrationSummary, path: &Path) -> Result<(), CliError> {
    tokio::fs::write(path, to_json(summary)?).await?;
    Ok(())
}

pub fn print_summary(summary: &MigrationSummary) -> Result<(), CliError> {
    println!("{}", to_json(summary)?);
    Ok(())
}

pub fn print_plan(plan: &PlanReport) -> Result<(), CliError> {
    println!("{}", to_json(plan)?);
    Ok(())
}
