use crate::error::Error;
use crate::model::CanonicalRecord;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Dotted paths from canonical field name into the raw nested item.
const FIELD_PATHS: [(&str, &str); 10] = [
    ("id", "id"),
    ("name", "name"),
    ("username", "login.username"),
    ("password", "login.password"),
    ("revisionDate", "revisionDate"),
    ("creationDate", "creationDate"),
    ("deletedDate", "deletedDate"),
    ("uri", "login.uris.uri"),
    ("totp", "login.totp"),
    ("type", "type"),
];

/// Resolves a dotted path against a nested value. Each segment addresses a
/// map key; a segment hitting a list position resolves to the first element,
/// except the literal segment `uri`, which picks the `uri` property of the
/// first list element. A missing segment stops traversal and yields None.
fn extract<'a>(item: &'a Value, path: &str) -> Option<&'a Value> {
    let mut value = item;
    for segment in path.split('.') {
        value = match value {
            Value::Array(elements) => {
                let first = elements.first()?;
                if segment == "uri" {
                    first.get("uri")?
                } else {
                    first
                }
            }
            Value::Object(_) => value.get(segment)?,
            _ => return None,
        };
        if value.is_null() {
            return None;
        }
    }
    Some(value)
}

fn extract_string(item: &Value, path: &str) -> Option<String> {
    extract(item, path).and_then(|v| v.as_str()).map(String::from)
}

/// Lower-cased string extraction for identity-relevant fields. Idempotent:
/// values already lower-cased come back unchanged.
fn extract_lowercase(item: &Value, path: &str) -> Option<String> {
    extract_string(item, path).map(|s| s.to_lowercase())
}

fn parse_timestamp(
    raw: &str,
    field: &'static str,
    id: &str,
) -> Result<DateTime<Utc>, Error> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| Error::InvalidTimestamp {
            id: id.to_string(),
            field,
            value: raw.to_string(),
        })
}

fn required_timestamp(
    item: &Value,
    path: &'static str,
    id: &str,
) -> Result<DateTime<Utc>, Error> {
    let raw = extract_string(item, path).ok_or(Error::MissingField {
        id: id.to_string(),
        field: path,
    })?;
    parse_timestamp(&raw, path, id)
}

/// Flattens one raw vault item into a CanonicalRecord.
///
/// Input errors are fatal: dedup cannot order records with unparseable
/// dates, and a record with no identity fields at all cannot be grouped.
pub fn normalize_item(item: &Value) -> Result<CanonicalRecord, Error> {
    let id = extract_string(item, field_path("id"));
    let id_for_errors = id.clone().unwrap_or_else(|| "<no id>".to_string());

    let username = extract_lowercase(item, field_path("username"));
    let uri = extract_lowercase(item, field_path("uri"));
    let password = extract_string(item, field_path("password"));

    if username.is_none() && uri.is_none() && password.is_none() {
        return Err(Error::MissingIdentity { id: id_for_errors });
    }

    let revision_date = required_timestamp(item, "revisionDate", &id_for_errors)?;
    let creation_date = required_timestamp(item, "creationDate", &id_for_errors)?;
    let deleted_date = match extract_string(item, field_path("deletedDate")) {
        Some(raw) => Some(parse_timestamp(&raw, "deletedDate", &id_for_errors)?),
        None => None,
    };

    let item_type = extract(item, field_path("type"))
        .and_then(|v| v.as_i64())
        .ok_or(Error::MissingField {
            id: id_for_errors.clone(),
            field: "type",
        })?;

    Ok(CanonicalRecord {
        id,
        name: extract_string(item, field_path("name")),
        username,
        password,
        revision_date,
        creation_date,
        deleted_date,
        uri,
        totp: extract_string(item, field_path("totp")),
        item_type,
    })
}

/// Flattens a batch of raw items. Any single malformed item aborts the run
/// before deletion can happen, to avoid masking data-quality problems.
pub fn normalize_items(items: &[Value]) -> Result<Vec<CanonicalRecord>, Error> {
    items.iter().map(normalize_item).collect()
}

fn field_path(field: &str) -> &'static str {
    FIELD_PATHS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, path)| *path)
        .expect("unknown canonical field")
}
