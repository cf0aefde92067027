use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexOrder {
    Ascending,
    Descending,
}

impl IndexOrder {
    pub fn as_i32(&self) -> i32 {
        match self {
            IndexOrder::Ascending => 1,
            IndexOrder::Descending => -1,
        }
    }
}

/// Locale-aware string comparison rules for an index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexCollation {
    pub locale: String,
    /// ICU comparison level; 3 (tertiary) distinguishes case.
    pub strength: u32,
}

/// A destination index declaration, independent of the store it lands in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSpec {
    pub keys: Vec<(String, IndexOrder)>,
    pub unique: bool,
    pub collation: Option<IndexCollation>,
}

impl IndexSpec {
    pub fn ascending(field: &str) -> Self {
        IndexSpec {
            keys: vec![(field.to_string(), IndexOrder::Ascending)],
            unique: false,
            collation: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_collation(mut self, locale: &str, strength: u32) -> Self {
        self.collation = Some(IndexCollation {
            locale: locale.to_string(),
            strength,
        });
        self
    }

    /// Conventional `<field>_<order>` index name.
    pub fn name(&self) -> String {
        self.keys
            .iter()
            .map(|(field, order)| format!("{field}_{}", order.as_i32()))
            .collect::<Vec<_>>()
            .join("_")
    }
}
