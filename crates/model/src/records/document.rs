use crate::core::value::Value;
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;

/// Destination keys of the document schema, in the order they are written.
pub mod keys {
    pub const TAX_ID: &str = "cpf";
    pub const NAME: &str = "nome";
    pub const BIRTH_DATE: &str = "nasc";
    pub const INCOME: &str = "renda";
    pub const AFFINITY_SCORE: &str = "affinity_score";
    pub const AFFINITY_PERCENT: &str = "affinity_percent";
    pub const SEX: &str = "sexo";
    pub const OCCUPATION: &str = "cbo";
    pub const MOTHER_NAME: &str = "mae";
    pub const SCORE: &str = "nota";
    pub const BANK: &str = "banco";
    pub const SPOUSE_TAX_ID: &str = "cpf_conjuge";
    pub const PUBLIC_SERVANT: &str = "serv_publico";
    pub const DEATH_DATE: &str = "data_obito";
    pub const CITY: &str = "cidade";
    pub const ADDRESS: &str = "endereco";
    pub const NEIGHBORHOOD: &str = "bairro";
    pub const POSTAL_CODE: &str = "cep";
    pub const STATE: &str = "uf";
    pub const UPDATED_AT: &str = "data_atualizacao";
    pub const CONTACTS: &str = "contatos";
    pub const PHONES: &str = "telefones";
    pub const EMAILS: &str = "emails";

    /// Dotted path of the phone number array.
    pub const CONTACT_PHONES: &str = "contatos.telefones";
    /// Dotted path of the email array.
    pub const CONTACT_EMAILS: &str = "contatos.emails";
}

/// Repeating contact fields. Only non-empty strings make it in here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contacts {
    pub phones: Vec<String>,
    pub emails: Vec<String>,
}

/// A converted person record, ready for the destination.
///
/// `None` means the value was absent or could not be converted; it is written
/// as null, never skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Document {
    pub tax_id: Option<String>,
    pub name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub income: Option<BigDecimal>,
    pub affinity_score: Option<BigDecimal>,
    pub affinity_percent: Option<BigDecimal>,
    pub sex: Option<String>,
    pub occupation: Option<String>,
    pub mother_name: Option<String>,
    pub score: Option<String>,
    pub bank: Option<String>,
    pub spouse_tax_id: Option<Value>,
    pub public_servant: Option<Value>,
    pub death_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub neighborhood: Option<Value>,
    pub postal_code: Option<String>,
    pub state: Option<String>,
    pub updated_at: Option<DateTime<Tz>>,
    pub contacts: Contacts,
}
