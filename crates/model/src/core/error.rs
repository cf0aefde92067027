use thiserror::Error;

/// Raised when the field mapping does not fit the shape of the source rows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MappingError {
    /// Ordinals are 1-based; zero can never address a column.
    #[error("Field '{field}' is mapped to ordinal 0 (ordinals are 1-based)")]
    ZeroOrdinal { field: String },

    #[error("Field '{field}' is mapped to column {ordinal}, but the source only has {columns} columns")]
    OrdinalOutOfRange {
        field: String,
        ordinal: usize,
        columns: usize,
    },
}
