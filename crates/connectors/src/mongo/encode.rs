use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, TimeZone};
use model::{
    core::value::Value,
    records::document::{Contacts, Document, keys},
};
use mongodb::bson::{
    Binary, Bson, DateTime as BsonDateTime, Decimal128, Document as BsonDocument,
    spec::BinarySubtype,
};
use tracing::warn;

/// Encodes a document with the fixed field order of the collection schema.
/// Absent values are written as null so every document has every key.
pub fn to_bson(doc: &Document) -> BsonDocument {
    let mut out = BsonDocument::new();
    out.insert(keys::TAX_ID, text(&doc.tax_id));
    out.insert(keys::NAME, text(&doc.name));
    out.insert(keys::BIRTH_DATE, date(&doc.birth_date));
    out.insert(keys::INCOME, decimal(&doc.income));
    out.insert(keys::AFFINITY_SCORE, decimal(&doc.affinity_score));
    out.insert(keys::AFFINITY_PERCENT, decimal(&doc.affinity_percent));
    out.insert(keys::SEX, text(&doc.sex));
    out.insert(keys::OCCUPATION, text(&doc.occupation));
    out.insert(keys::MOTHER_NAME, text(&doc.mother_name));
    out.insert(keys::SCORE, text(&doc.score));
    out.insert(keys::BANK, text(&doc.bank));
    out.insert(keys::SPOUSE_TAX_ID, raw(&doc.spouse_tax_id));
    out.insert(keys::PUBLIC_SERVANT, raw(&doc.public_servant));
    out.insert(keys::DEATH_DATE, date(&doc.death_date));
    out.insert(keys::CITY, text(&doc.city));
    out.insert(keys::ADDRESS, text(&doc.address));
    out.insert(keys::NEIGHBORHOOD, raw(&doc.neighborhood));
    out.insert(keys::POSTAL_CODE, text(&doc.postal_code));
    out.insert(keys::STATE, text(&doc.state));
    out.insert(
        keys::UPDATED_AT,
        doc.updated_at.as_ref().map_or(Bson::Null, instant),
    );
    out.insert(keys::CONTACTS, contacts(&doc.contacts));
    out
}

fn contacts(contacts: &Contacts) -> BsonDocument {
    let mut out = BsonDocument::new();
    out.insert(keys::PHONES, strings(&contacts.phones));
    out.insert(keys::EMAILS, strings(&contacts.emails));
    out
}

fn strings(values: &[String]) -> Bson {
    Bson::Array(values.iter().cloned().map(Bson::String).collect())
}

fn text(value: &Option<String>) -> Bson {
    value.clone().map_or(Bson::Null, Bson::String)
}

fn date(value: &Option<NaiveDate>) -> Bson {
    value.as_ref().map_or(Bson::Null, midnight)
}

fn midnight(date: &NaiveDate) -> Bson {
    match date.and_hms_opt(0, 0, 0) {
        Some(naive) => Bson::DateTime(BsonDateTime::from_millis(
            naive.and_utc().timestamp_millis(),
        )),
        None => Bson::Null,
    }
}

fn instant<Tz: TimeZone>(ts: &DateTime<Tz>) -> Bson {
    Bson::DateTime(BsonDateTime::from_millis(ts.timestamp_millis()))
}

fn decimal(value: &Option<BigDecimal>) -> Bson {
    value.as_ref().map_or(Bson::Null, decimal128)
}

fn decimal128(value: &BigDecimal) -> Bson {
    match value.to_string().parse::<Decimal128>() {
        Ok(d) => Bson::Decimal128(d),
        Err(e) => {
            warn!("Decimal {value} does not fit Decimal128, writing null: {e}");
            Bson::Null
        }
    }
}

fn raw(value: &Option<Value>) -> Bson {
    match value {
        None | Some(Value::Null) => Bson::Null,
        Some(Value::Int(i)) => Bson::Int64(*i),
        Some(Value::Uint(u)) => match i64::try_from(*u) {
            Ok(i) => Bson::Int64(i),
            Err(_) => Bson::String(u.to_string()),
        },
        Some(Value::Float(f)) => Bson::Double(*f),
        Some(Value::Decimal(d)) => decimal128(d),
        Some(Value::String(s)) => Bson::String(s.clone()),
        Some(Value::Bytes(bytes)) => Bson::Binary(Binary {
            subtype: BinarySubtype::Generic,
            bytes: bytes.clone(),
        }),
        Some(Value::Date(d)) => midnight(d),
        Some(Value::Timestamp(ts)) => instant(ts),
    }
}
