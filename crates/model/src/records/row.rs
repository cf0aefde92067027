use crate::core::{error::MappingError, value::Value};

/// One source row: raw values in column order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceRow {
    values: Vec<Value>,
}

impl SourceRow {
    pub fn new(values: Vec<Value>) -> Self {
        SourceRow { values }
    }

    /// Looks up a column by its 1-based ordinal.
    ///
    /// `field` is only used to name the culprit when the ordinal does not
    /// address a column; a misaligned mapping must fail instead of silently
    /// reading a neighbouring column.
    pub fn column(&self, field: &str, ordinal: usize) -> Result<&Value, MappingError> {
        if ordinal == 0 {
            return Err(MappingError::ZeroOrdinal {
                field: field.to_string(),
            });
        }

        self.values
            .get(ordinal - 1)
            .ok_or_else(|| MappingError::OrdinalOutOfRange {
                field: field.to_string(),
                ordinal,
                columns: self.values.len(),
            })
    }
}

impl From<Vec<Value>> for SourceRow {
    fn from(values: Vec<Value>) -> Self {
        SourceRow::new(values)
    }
}
