use crate::{core::error::MappingError, records::document::keys};
use serde::{Deserialize, Serialize};

/// Source column ordinals (1-based) of the repeating contact fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactOrdinals {
    #[serde(rename = "telefones", default)]
    pub phones: Vec<usize>,
    #[serde(rename = "emails", default)]
    pub emails: Vec<usize>,
}

/// Maps every document field to the 1-based source column it is read from.
///
/// Loaded once and shared read-only by all workers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    #[serde(rename = "cpf")]
    pub tax_id: usize,
    #[serde(rename = "nome")]
    pub name: usize,
    #[serde(rename = "nasc")]
    pub birth_date: usize,
    #[serde(rename = "renda")]
    pub income: usize,
    pub affinity_score: usize,
    pub affinity_percent: usize,
    #[serde(rename = "sexo")]
    pub sex: usize,
    #[serde(rename = "cbo")]
    pub occupation: usize,
    #[serde(rename = "mae")]
    pub mother_name: usize,
    #[serde(rename = "nota")]
    pub score: usize,
    #[serde(rename = "banco")]
    pub bank: usize,
    #[serde(rename = "cpf_conjuge")]
    pub spouse_tax_id: usize,
    #[serde(rename = "serv_publico")]
    pub public_servant: usize,
    #[serde(rename = "data_obito")]
    pub death_date: usize,
    #[serde(rename = "cidade")]
    pub city: usize,
    #[serde(rename = "endereco")]
    pub address: usize,
    #[serde(rename = "bairro")]
    pub neighborhood: usize,
    #[serde(rename = "cep")]
    pub postal_code: usize,
    #[serde(rename = "uf")]
    pub state: usize,
    #[serde(rename = "data_atualizacao")]
    pub updated_at: usize,
    #[serde(rename = "contatos", default)]
    pub contacts: ContactOrdinals,
}

impl FieldMapping {
    /// Every (destination key, ordinal) pair, repeating groups included.
    pub fn ordinals(&self) -> Vec<(&'static str, usize)> {
        let mut ordinals = vec![
            (keys::TAX_ID, self.tax_id),
            (keys::NAME, self.name),
            (keys::BIRTH_DATE, self.birth_date),
            (keys::INCOME, self.income),
            (keys::AFFINITY_SCORE, self.affinity_score),
            (keys::AFFINITY_PERCENT, self.affinity_percent),
            (keys::SEX, self.sex),
            (keys::OCCUPATION, self.occupation),
            (keys::MOTHER_NAME, self.mother_name),
            (keys::SCORE, self.score),
            (keys::BANK, self.bank),
            (keys::SPOUSE_TAX_ID, self.spouse_tax_id),
            (keys::PUBLIC_SERVANT, self.public_servant),
            (keys::DEATH_DATE, self.death_date),
            (keys::CITY, self.city),
            (keys::ADDRESS, self.address),
            (keys::NEIGHBORHOOD, self.neighborhood),
            (keys::POSTAL_CODE, self.postal_code),
            (keys::STATE, self.state),
            (keys::UPDATED_AT, self.updated_at),
        ];
        ordinals.extend(self.contacts.phones.iter().map(|&o| (keys::CONTACT_PHONES, o)));
        ordinals.extend(self.contacts.emails.iter().map(|&o| (keys::CONTACT_EMAILS, o)));
        ordinals
    }

    /// Highest ordinal referenced; the source must have at least this many columns.
    pub fn max_ordinal(&self) -> usize {
        self.ordinals()
            .into_iter()
            .map(|(_, ordinal)| ordinal)
            .max()
            .unwrap_or(0)
    }

    /// Rejects zero ordinals regardless of the source shape.
    pub fn validate(&self) -> Result<(), MappingError> {
        match self.ordinals().into_iter().find(|(_, ordinal)| *ordinal == 0) {
            Some((field, _)) => Err(MappingError::ZeroOrdinal {
                field: field.to_string(),
            }),
            None => Ok(()),
        }
    }

    /// Checks every ordinal against the column count of the source query.
    pub fn validate_columns(&self, columns: usize) -> Result<(), MappingError> {
        self.validate()?;
        match self
            .ordinals()
            .into_iter()
            .find(|(_, ordinal)| *ordinal > columns)
        {
            Some((field, ordinal)) => Err(MappingError::OrdinalOutOfRange {
                field: field.to_string(),
                ordinal,
                columns,
            }),
            None => Ok(()),
        }
    }

    /// Maps the scalar fields to consecutive columns `1..=20`; handy for tests
    /// and for sources laid out in document order.
    pub fn sequential(phones: Vec<usize>, emails: Vec<usize>) -> Self {
        FieldMapping {
            tax_id: 1,
            name: 2,
            birth_date: 3,
            income: 4,
            affinity_score: 5,
            affinity_percent: 6,
            sex: 7,
            occupation: 8,
            mother_name: 9,
            score: 10,
            bank: 11,
            spouse_tax_id: 12,
            public_servant: 13,
            death_date: 14,
            city: 15,
            address: 16,
            neighborhood: 17,
            postal_code: 18,
            state: 19,
            updated_at: 20,
            contacts: ContactOrdinals { phones, emails },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_original_keys() {
        let json = r#"{
            "cpf": 1, "nome": 2, "nasc": 3, "renda": 4, "affinity_score": 5,
            "affinity_percent": 6, "sexo": 7, "cbo": 8, "mae": 9, "nota": 10,
            "banco": 11, "cpf_conjuge": 12, "serv_publico": 13, "data_obito": 14,
            "cidade": 15, "endereco": 16, "bairro": 17, "cep": 18, "uf": 19,
            "data_atualizacao": 20,
            "contatos": { "telefones": [21, 22], "emails": [23] }
        }"#;
        let mapping: FieldMapping = serde_json::from_str(json).unwrap();
        assert_eq!(mapping, FieldMapping::sequential(vec![21, 22], vec![23]));
        assert_eq!(mapping.max_ordinal(), 23);
    }

    #[test]
    fn validate_columns_names_the_offending_field() {
        let mapping = FieldMapping::sequential(vec![21], vec![30]);
        assert_eq!(
            mapping.validate_columns(25),
            Err(MappingError::OrdinalOutOfRange {
                field: keys::CONTACT_EMAILS.to_string(),
                ordinal: 30,
                columns: 25,
            })
        );
        assert!(mapping.validate_columns(30).is_ok());
    }

    #[test]
    fn zero_ordinal_is_rejected() {
        let mut mapping = FieldMapping::sequential(vec![], vec![]);
        mapping.bank = 0;
        assert_eq!(
            mapping.validate(),
            Err(MappingError::ZeroOrdinal {
                field: keys::BANK.to_string()
            })
        );
    }
}
