use engine_core::convert::{
    normalize_optional, normalize_text, parse_date, parse_decimal, parse_timestamp,
};
use model::{
    core::error::MappingError,
    records::{
        document::{Contacts, Document, keys},
        row::SourceRow,
    },
    transform::mapping::FieldMapping,
};
use std::sync::Arc;

/// Turns positional source rows into documents.
///
/// Conversion never fails; only a mapping that addresses a missing column
/// does, and that is reported on the first affected row.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    mapping: Arc<FieldMapping>,
}

impl DocumentBuilder {
    pub fn new(mapping: Arc<FieldMapping>) -> Self {
        Self { mapping }
    }

    /// Fails fast when the result set is narrower than the mapping.
    pub fn check_columns(&self, columns: usize) -> Result<(), MappingError> {
        self.mapping.validate_columns(columns)
    }

    pub fn build(&self, row: &SourceRow) -> Result<Document, MappingError> {
        let m = &*self.mapping;
        let text = |field: &str, ordinal| row.column(field, ordinal).map(normalize_text);
        let date = |field: &str, ordinal| row.column(field, ordinal).map(parse_date);
        let decimal = |field: &str, ordinal| row.column(field, ordinal).map(parse_decimal);
        let optional = |field: &str, ordinal| row.column(field, ordinal).map(normalize_optional);

        Ok(Document {
            tax_id: text(keys::TAX_ID, m.tax_id)?,
            name: text(keys::NAME, m.name)?,
            birth_date: date(keys::BIRTH_DATE, m.birth_date)?,
            income: decimal(keys::INCOME, m.income)?,
            affinity_score: decimal(keys::AFFINITY_SCORE, m.affinity_score)?,
            affinity_percent: decimal(keys::AFFINITY_PERCENT, m.affinity_percent)?,
            sex: text(keys::SEX, m.sex)?,
            occupation: text(keys::OCCUPATION, m.occupation)?,
            mother_name: text(keys::MOTHER_NAME, m.mother_name)?,
            score: text(keys::SCORE, m.score)?,
            bank: text(keys::BANK, m.bank)?,
            spouse_tax_id: optional(keys::SPOUSE_TAX_ID, m.spouse_tax_id)?,
            public_servant: optional(keys::PUBLIC_SERVANT, m.public_servant)?,
            death_date: date(keys::DEATH_DATE, m.death_date)?,
            city: text(keys::CITY, m.city)?,
            address: text(keys::ADDRESS, m.address)?,
            neighborhood: optional(keys::NEIGHBORHOOD, m.neighborhood)?,
            postal_code: text(keys::POSTAL_CODE, m.postal_code)?,
            state: text(keys::STATE, m.state)?,
            updated_at: row
                .column(keys::UPDATED_AT, m.updated_at)
                .map(parse_timestamp)?,
            contacts: Contacts {
                phones: repeated(row, keys::CONTACT_PHONES, &m.contacts.phones)?,
                emails: repeated(row, keys::CONTACT_EMAILS, &m.contacts.emails)?,
            },
        })
    }
}

/// Collects a repeating group, keeping only non-empty text.
fn repeated(row: &SourceRow, field: &str, ordinals: &[usize]) -> Result<Vec<String>, MappingError> {
    let mut values = Vec::with_capacity(ordinals.len());
    for &ordinal in ordinals {
        if let Some(text) = normalize_text(row.column(field, ordinal)?)
            && !text.is_empty()
        {
            values.push(text);
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use model::core::value::Value;
    use std::str::FromStr;

    fn builder(phones: Vec<usize>, emails: Vec<usize>) -> DocumentBuilder {
        DocumentBuilder::new(Arc::new(FieldMapping::sequential(phones, emails)))
    }

    fn person_row(extra: Vec<Value>) -> SourceRow {
        let mut values = vec![
            Value::from("123.456.789-01"),
            Value::from("  Maria da Silva\r\n"),
            Value::from("19870309"),
            Value::Float(2500.456),
            Value::from("0.87"),
            Value::Null,
            Value::from("F"),
            Value::from("252105"),
            Value::from("Ana da Silva"),
            Value::from("A"),
            Value::from("341"),
            Value::from("0"),
            Value::Int(1),
            Value::from(""),
            Value::from("Campinas"),
            Value::from("Rua das Flores, 10"),
            Value::from(""),
            Value::from("13010-000"),
            Value::from("SP"),
            Value::from("2024-01-15 13:00:00"),
        ];
        values.extend(extra);
        SourceRow::new(values)
    }

    #[test]
    fn each_field_uses_its_converter() {
        let doc = builder(vec![], vec![]).build(&person_row(vec![])).unwrap();

        assert_eq!(doc.tax_id.as_deref(), Some("123.456.789-01"));
        assert_eq!(doc.name.as_deref(), Some("Maria da Silva"));
        assert_eq!(doc.birth_date, NaiveDate::from_ymd_opt(1987, 3, 9));
        assert_eq!(doc.income, Some(BigDecimal::from_str("2500.46").unwrap()));
        assert_eq!(doc.affinity_score, Some(BigDecimal::from_str("0.87").unwrap()));
        assert_eq!(doc.affinity_percent, None);
        assert_eq!(doc.spouse_tax_id, None);
        assert_eq!(doc.public_servant, Some(Value::Int(1)));
        assert_eq!(doc.death_date, None);
        assert_eq!(doc.neighborhood, None);
        assert_eq!(doc.state.as_deref(), Some("SP"));
        assert!(doc.updated_at.is_some());
    }

    #[test]
    fn empty_and_null_contacts_are_dropped() {
        let row = person_row(vec![
            Value::from(""),
            Value::from("5511999999999"),
            Value::Null,
            Value::from("maria@example.com"),
        ]);
        let doc = builder(vec![21, 22, 23], vec![24]).build(&row).unwrap();

        assert_eq!(doc.contacts.phones, vec!["5511999999999".to_string()]);
        assert_eq!(doc.contacts.emails, vec!["maria@example.com".to_string()]);
    }

    #[test]
    fn whitespace_only_contact_is_dropped() {
        let row = person_row(vec![Value::from(" \r\n ")]);
        let doc = builder(vec![21], vec![]).build(&row).unwrap();
        assert!(doc.contacts.phones.is_empty());
    }

    #[test]
    fn ordinal_past_the_row_is_a_mapping_error() {
        let err = builder(vec![30], vec![])
            .build(&person_row(vec![]))
            .unwrap_err();
        assert_eq!(
            err,
            MappingError::OrdinalOutOfRange {
                field: keys::CONTACT_PHONES.to_string(),
                ordinal: 30,
                columns: 20,
            }
        );
    }

    #[test]
    fn narrow_result_set_is_rejected_up_front() {
        let b = builder(vec![21], vec![]);
        assert!(b.check_columns(21).is_ok());
        assert!(b.check_columns(20).is_err());
    }
}
