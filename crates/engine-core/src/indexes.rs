use model::{records::document::keys, schema::index::IndexSpec};

const NAME_LOCALE: &str = "pt";
const NAME_COLLATION_STRENGTH: u32 = 3;

/// Indexes built on the destination collection once every range is loaded.
///
/// The tax id is unique, so duplicate source rows fail the indexing step
/// instead of being silently accepted.
pub fn document_indexes() -> Vec<IndexSpec> {
    vec![
        IndexSpec::ascending(keys::TAX_ID).unique(),
        IndexSpec::ascending(keys::NAME).with_collation(NAME_LOCALE, NAME_COLLATION_STRENGTH),
        IndexSpec::ascending(keys::CONTACT_PHONES),
        IndexSpec::ascending(keys::CONTACT_EMAILS),
    ]
}
