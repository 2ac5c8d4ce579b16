use chrono::NaiveDate;
use serde_json::{Map, Value};

use super::{normalize_gender, require_identity, SourceExtractor};
use crate::error::{MaskCheckError, Result};
use crate::policy::parse_plain_date;
use crate::record::{Address, AddressList, Channel, CustomerRecord, Observed, ValueForm};

/// Extractor for the intercepted customer-detail API payload.
///
/// The payload's key casing is not stable across backend versions; each
/// field is looked up under every name variant observed in the wild.
/// Dates arrive in ISO form and are normalized to `DD/MM/YYYY` so the
/// verifier compares a single representation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiExtractor;

impl SourceExtractor for ApiExtractor {
    type Input = Value;

    fn channel(&self) -> Channel {
        Channel::Api
    }

    fn extract(&self, payload: &Value) -> Result<CustomerRecord> {
        let obj = envelope(payload)
            .ok_or_else(|| MaskCheckError::missing(Channel::Api, "customer object"))?;

        let record = CustomerRecord {
            channel: Channel::Api,
            form: ValueForm::Raw,
            vespisti_id: field(obj, &["vespistiId", "vespisti_id"]),
            first_name: field(obj, &["firstName", "first_name"]),
            last_name: field(obj, &["lastName", "last_name"]),
            email: field(obj, &["email"]),
            phone: field(obj, &["phone", "phoneNumber", "phone_number"]),
            gender: normalize_gender(field(obj, &["gender"])),
            date_of_birth: date_field(obj, &["dateOfBirth", "date_of_birth", "dob"]),
            created_at: date_field(obj, &["createdAt", "created_at"]),
            updated_at: date_field(obj, &["updatedAt", "updated_at"]),
            deleted_at: date_field(obj, &["deletedAt", "deleted_at"]),
            addresses: addresses(obj),
        };

        require_identity(&record)?;
        Ok(record)
    }
}

/// Some backend versions wrap the customer object in a `data` envelope.
fn envelope(payload: &Value) -> Option<&Map<String, Value>> {
    let obj = payload.as_object()?;
    match obj.get("data").and_then(Value::as_object) {
        Some(inner) => Some(inner),
        None => Some(obj),
    }
}

fn pick<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| obj.get(*k))
}

fn field(obj: &Map<String, Value>, keys: &[&str]) -> Observed {
    match pick(obj, keys) {
        None | Some(Value::Null) => Observed::Blank,
        Some(Value::String(s)) => Observed::from_value(Some(s)),
        Some(Value::Number(n)) => Observed::Present(n.to_string()),
        Some(other) => Observed::Present(other.to_string()),
    }
}

fn date_field(obj: &Map<String, Value>, keys: &[&str]) -> Observed {
    match field(obj, keys) {
        Observed::Present(v) => Observed::Present(normalize_date(&v)),
        other => other,
    }
}

/// `2024-01-15` and `2024-01-15T10:20:30Z` both become `15/01/2024`;
/// values already in `DD/MM/YYYY` pass through. Anything unrecognized is
/// kept verbatim so format validation can flag it.
fn normalize_date(value: &str) -> String {
    let trimmed = value.trim();
    if parse_plain_date(trimmed).is_some() {
        return trimmed.to_string();
    }
    let date_part = trimmed.get(..10).unwrap_or(trimmed);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

fn addresses(obj: &Map<String, Value>) -> AddressList {
    let items = match pick(obj, &["addresses", "address"]).and_then(Value::as_array) {
        Some(items) => items,
        None => return AddressList::Known(Vec::new()),
    };
    AddressList::Known(
        items
            .iter()
            .filter_map(Value::as_object)
            .map(|a| Address {
                line: field(a, &["address", "addressLine", "address_line", "line"]),
                sub_district: field(a, &["subDistrict", "sub_district", "subdistrict"]),
                district: field(a, &["district"]),
                province: field(a, &["province"]),
                postcode: field(a, &["postcode", "postalCode", "postal_code", "zipCode", "zip_code"]),
            })
            .collect(),
    )
}
