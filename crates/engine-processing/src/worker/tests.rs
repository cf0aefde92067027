use super::*;
use async_trait::async_trait;
use connectors::{error::DbError, source::RowCursor};
use model::{
    core::value::Value, records::row::SourceRow, schema::index::IndexSpec,
    transform::mapping::FieldMapping,
};
use std::sync::Mutex;

const COLUMNS: usize = 22;

fn row(n: u64) -> SourceRow {
    let mut values: Vec<Value> = (1..=20).map(|c| Value::from(format!("r{n}c{c}"))).collect();
    values.push(Value::from(format!("55119{n:08}")));
    values.push(Value::Null);
    SourceRow::new(values)
}

#[derive(Default)]
struct TableSource {
    rows: u64,
    fail_query: bool,
    fail_scan_at: Option<u64>,
}

struct TableCursor {
    columns: Vec<String>,
    next: u64,
    end: u64,
    fail_scan_at: Option<u64>,
}

#[async_trait]
impl RecordSource for TableSource {
    async fn check_connection(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn count_records(&self, _cap: Option<u64>) -> Result<u64, DbError> {
        Ok(self.rows)
    }

    async fn fetch_range(&self, range: WorkRange) -> Result<Box<dyn RowCursor>, DbError> {
        if self.fail_query {
            return Err(DbError::Unknown("connection reset".into()));
        }
        Ok(Box::new(TableCursor {
            columns: (1..=COLUMNS).map(|c| format!("c{c}")).collect(),
            next: range.start,
            end: range.end.min(self.rows),
            fail_scan_at: self.fail_scan_at,
        }))
    }
}

#[async_trait]
impl RowCursor for TableCursor {
    fn columns(&self) -> Result<&[String], DbError> {
        Ok(&self.columns)
    }

    async fn next_row(&mut self) -> Result<Option<SourceRow>, DbError> {
        if self.next > self.end {
            return Ok(None);
        }
        if self.fail_scan_at == Some(self.next) {
            return Err(DbError::Unknown("malformed packet".into()));
        }
        let current = self.next;
        self.next += 1;
        Ok(Some(row(current)))
    }
}

#[derive(Default)]
struct Sink {
    batches: Mutex<Vec<Vec<Document>>>,
    fail: bool,
    cancel_after_first: Option<CancellationToken>,
}

#[async_trait]
impl DocumentDestination for Sink {
    async fn check_connection(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn drop_collection(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert_batch(&self, docs: &[Document]) -> Result<(), DbError> {
        if self.fail {
            return Err(DbError::Unknown("disk full".into()));
        }
        self.batches.lock().unwrap().push(docs.to_vec());
        if let Some(token) = &self.cancel_after_first {
            token.cancel();
        }
        Ok(())
    }

    async fn create_indexes(&self, _specs: &[IndexSpec]) -> Result<(), DbError> {
        Ok(())
    }
}

impl Sink {
    fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

struct Harness {
    ctx: WorkerContext,
    sink: Arc<Sink>,
    progress: mpsc::Receiver<u64>,
}

fn harness(source: TableSource, sink: Sink) -> Harness {
    let sink = Arc::new(sink);
    let (tx, rx) = mpsc::channel(64);
    let ctx = WorkerContext {
        source: Arc::new(source),
        destination: sink.clone(),
        builder: Arc::new(DocumentBuilder::new(Arc::new(FieldMapping::sequential(
            vec![21, 22],
            vec![],
        )))),
        progress: tx,
        cancel: CancellationToken::new(),
    };
    Harness {
        ctx,
        sink,
        progress: rx,
    }
}

fn drain(rx: &mut mpsc::Receiver<u64>) -> Vec<u64> {
    let mut units = Vec::new();
    while let Ok(unit) = rx.try_recv() {
        units.push(unit);
    }
    units
}

#[tokio::test]
async fn flushes_full_batches_then_the_remainder() {
    let mut h = harness(
        TableSource {
            rows: 20,
            ..Default::default()
        },
        Sink::default(),
    );

    let report = MigrationWorker::new(2, WorkRange::new(3, 12), 4, h.ctx.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.docs_written, 10);
    assert_eq!(report.batches, 3);
    assert!(!report.cancelled);
    assert_eq!(h.sink.batch_sizes(), vec![4, 4, 2]);
    assert_eq!(drain(&mut h.progress), vec![4, 4, 2]);

    let batches = h.sink.batches.lock().unwrap();
    let first = &batches[0][0];
    assert_eq!(first.tax_id.as_deref(), Some("r3c1"));
    assert_eq!(first.contacts.phones, vec!["5511900000003".to_string()]);
}

#[tokio::test]
async fn exact_multiple_never_emits_an_empty_flush() {
    let mut h = harness(
        TableSource {
            rows: 8,
            ..Default::default()
        },
        Sink::default(),
    );

    MigrationWorker::new(1, WorkRange::new(1, 8), 4, h.ctx.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(h.sink.batch_sizes(), vec![4, 4]);
    assert_eq!(drain(&mut h.progress), vec![4, 4]);
}

#[tokio::test]
async fn empty_range_does_no_work() {
    let mut h = harness(
        TableSource {
            fail_query: true,
            ..Default::default()
        },
        Sink::default(),
    );

    let report = MigrationWorker::new(1, WorkRange::new(1, 0), 4, h.ctx.clone())
        .run()
        .await
        .unwrap();

    assert_eq!(report.docs_written, 0);
    assert!(h.sink.batch_sizes().is_empty());
    assert!(drain(&mut h.progress).is_empty());
}

#[tokio::test]
async fn query_failure_is_tagged_with_the_worker() {
    let h = harness(
        TableSource {
            rows: 5,
            fail_query: true,
            ..Default::default()
        },
        Sink::default(),
    );

    let err = MigrationWorker::new(4, WorkRange::new(1, 5), 2, h.ctx.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::Query { worker_id: 4, .. }));
    assert_eq!(err.worker_id(), 4);
}

#[tokio::test]
async fn scan_failure_reports_the_record() {
    let h = harness(
        TableSource {
            rows: 10,
            fail_scan_at: Some(7),
            ..Default::default()
        },
        Sink::default(),
    );

    let err = MigrationWorker::new(3, WorkRange::new(5, 10), 100, h.ctx.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WorkerError::Scan {
            worker_id: 3,
            record: 7,
            ..
        }
    ));
    assert!(h.sink.batch_sizes().is_empty());
}

#[tokio::test]
async fn insert_failure_stops_the_worker() {
    let mut h = harness(
        TableSource {
            rows: 10,
            ..Default::default()
        },
        Sink {
            fail: true,
            ..Default::default()
        },
    );

    let err = MigrationWorker::new(3, WorkRange::new(1, 10), 5, h.ctx.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::Insert { worker_id: 3, docs: 5, .. }));
    assert!(drain(&mut h.progress).is_empty());
}

#[tokio::test]
async fn narrow_result_set_is_a_mapping_error() {
    let mut h = harness(
        TableSource {
            rows: 3,
            ..Default::default()
        },
        Sink::default(),
    );
    h.ctx.builder = Arc::new(DocumentBuilder::new(Arc::new(FieldMapping::sequential(
        vec![40],
        vec![],
    ))));

    let err = MigrationWorker::new(1, WorkRange::new(1, 3), 2, h.ctx.clone())
        .run()
        .await
        .unwrap_err();

    assert!(matches!(err, WorkerError::Mapping { worker_id: 1, .. }));
    assert!(h.sink.batch_sizes().is_empty());
}

#[tokio::test]
async fn cancellation_stops_after_the_current_flush() {
    let token = CancellationToken::new();
    let mut h = harness(
        TableSource {
            rows: 100,
            ..Default::default()
        },
        Sink {
            cancel_after_first: Some(token.clone()),
            ..Default::default()
        },
    );
    h.ctx.cancel = token;

    let report = MigrationWorker::new(1, WorkRange::new(1, 100), 10, h.ctx.clone())
        .run()
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.docs_written, 10);
    assert_eq!(h.sink.batch_sizes(), vec![10]);
    assert_eq!(drain(&mut h.progress), vec![10]);
}

#[tokio::test]
async fn cancelled_before_start_queries_nothing() {
    let h = harness(
        TableSource {
            rows: 10,
            fail_query: true,
            ..Default::default()
        },
        Sink::default(),
    );
    h.ctx.cancel.cancel();

    let report = MigrationWorker::new(1, WorkRange::new(1, 10), 5, h.ctx.clone())
        .run()
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(report.docs_written, 0);
}
