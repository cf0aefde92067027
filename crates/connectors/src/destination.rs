use crate::error::DbError;
use async_trait::async_trait;
use model::{records::document::Document, schema::index::IndexSpec};

/// Write side of a migration: one document collection.
///
/// Safe to share between workers; every insert is independent.
#[async_trait]
pub trait DocumentDestination: Send + Sync {
    /// Round-trips to the server without touching the collection.
    async fn check_connection(&self) -> Result<(), DbError>;

    /// Drops the collection. Dropping a missing collection is not an error.
    async fn drop_collection(&self) -> Result<(), DbError>;

    async fn insert_batch(&self, docs: &[Document]) -> Result<(), DbError>;

    /// Submits every index in one request.
    async fn create_indexes(&self, specs: &[IndexSpec]) -> Result<(), DbError>;
}
