use async_trait::async_trait;
use connectors::{
    destination::DocumentDestination,
    error::DbError,
    source::{RecordSource, RowCursor},
};
use engine_core::progress::ProgressReport;
use model::{
    core::value::Value,
    pagination::range::WorkRange,
    records::{document::Document, row::SourceRow},
    schema::index::IndexSpec,
};
use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use tokio_util::sync::CancellationToken;

use crate::progress::ProgressSink;


pub const COLUMNS: usize = 22;

/// A person row in document column order with one phone, one empty phone
/// and a missing email.
pub fn person_row(n: u64) -> SourceRow {
    let mut values: Vec<Value> = (1..=20).map(|c| Value::from(format!("r{n}c{c}"))).collect();
    values[0] = Value::from(tax_id(n));
    values.push(Value::from(format!("55119{n:08}")));
    values.push(Value::from(""));
    SourceRow::new(values)
}

pub fn tax_id(n: u64) -> String {
    format!("{n:011}")
}

#[derive(Default)]
pub struct MemorySource {
    pub rows: Vec<SourceRow>,
    pub unreachable: bool,
    /// The connection check never answers.
    pub silent: bool,
    pub fail_count: bool,
    pub fail_fetch: bool,
}

impl MemorySource {
    pub fn with_people(count: u64) -> Self {
        MemorySource {
            rows: (1..=count).map(person_row).collect(),
            ..Default::default()
        }
    }
}

struct MemoryCursor {
    columns: Vec<String>,
    rows: std::vec::IntoIter<SourceRow>,
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn check_connection(&self) -> Result<(), DbError> {
        if self.silent {
            std::future::pending::<()>().await;
        }
        if self.unreachable {
            return Err(DbError::Unknown("Access denied for user 'crm'".into()));
        }
        Ok(())
    }

    async fn count_records(&self, cap: Option<u64>) -> Result<u64, DbError> {
        if self.fail_count {
            return Err(DbError::Unknown("table is locked".into()));
        }
        let total = self.rows.len() as u64;
        Ok(cap.map_or(total, |cap| total.min(cap)))
    }

    async fn fetch_range(&self, range: WorkRange) -> Result<Box<dyn RowCursor>, DbError> {
        if self.fail_fetch {
            return Err(DbError::Unknown("connection refused".into()));
        }
        let start = (range.start as usize).saturating_sub(1).min(self.rows.len());
        let end = (range.end as usize).min(self.rows.len()).max(start);
        Ok(Box::new(MemoryCursor {
            columns: (1..=COLUMNS).map(|c| format!("c{c}")).collect(),
            rows: self.rows[start..end].to_vec().into_iter(),
        }))
    }
}

#[async_trait]
impl RowCursor for MemoryCursor {
    fn columns(&self) -> Result<&[String], DbError> {
        Ok(&self.columns)
    }

    async fn next_row(&mut self) -> Result<Option<SourceRow>, DbError> {
        Ok(self.rows.next())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Drop,
    Insert(usize),
    Index(Vec<String>),
}

#[derive(Default)]
pub struct MemoryDestination {
    pub events: Mutex<Vec<Event>>,
    pub docs: Mutex<Vec<Document>>,
    /// Any batch holding one of these tax ids is rejected.
    pub reject_tax_ids: HashSet<String>,
    pub unreachable: bool,
    pub fail_drop: bool,
    pub fail_index: bool,
    /// Cancelled right after the first accepted insert.
    pub cancel_on_insert: Option<CancellationToken>,
}

impl MemoryDestination {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn index_calls(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Index(_)))
            .count()
    }

    pub fn tax_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .docs
            .lock()
            .unwrap()
            .iter()
            .filter_map(|d| d.tax_id.clone())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl DocumentDestination for MemoryDestination {
    async fn check_connection(&self) -> Result<(), DbError> {
        if self.unreachable {
            return Err(DbError::Unknown("server selection timeout".into()));
        }
        Ok(())
    }

    async fn drop_collection(&self) -> Result<(), DbError> {
        if self.fail_drop {
            return Err(DbError::Unknown("not authorized".into()));
        }
        self.events.lock().unwrap().push(Event::Drop);
        self.docs.lock().unwrap().clear();
        Ok(())
    }

    async fn insert_batch(&self, docs: &[Document]) -> Result<(), DbError> {
        let rejected = docs.iter().any(|d| {
            d.tax_id
                .as_ref()
                .is_some_and(|id| self.reject_tax_ids.contains(id))
        });
        if rejected {
            return Err(DbError::Unknown("E11000 duplicate key".into()));
        }

        self.events.lock().unwrap().push(Event::Insert(docs.len()));
        self.docs.lock().unwrap().extend_from_slice(docs);
        if let Some(token) = &self.cancel_on_insert {
            token.cancel();
        }
        Ok(())
    }

    async fn create_indexes(&self, specs: &[IndexSpec]) -> Result<(), DbError> {
        if self.fail_index {
            return Err(DbError::Unknown("E11000 duplicate key".into()));
        }
        self.events
            .lock()
            .unwrap()
            .push(Event::Index(specs.iter().map(IndexSpec::name).collect()));
        Ok(())
    }
}

#[derive(Default)]
pub struct CollectingSink {
    pub reports: Mutex<Vec<ProgressReport>>,
}

impl CollectingSink {
    pub fn reports(&self) -> Vec<ProgressReport> {
        self.reports.lock().unwrap().clone()
    }
}

impl ProgressSink for CollectingSink {
    fn emit(&self, report: &ProgressReport) {
        self.reports.lock().unwrap().push(report.clone());
    }
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
