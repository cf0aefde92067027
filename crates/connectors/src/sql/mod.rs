pub mod mysql;

/// Table names end up inside SQL text, so only identifier characters and a
/// schema dot are accepted.
pub fn is_safe_table_name(table: &str) -> bool {
    !table.is_empty()
        && table
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '$' | '.'))
}
