pub mod application;
pub mod company;
pub mod de;
pub mod job;
pub mod mentorship;
pub mod user;

pub use application::*;
pub use company::*;
pub use job::*;
pub use mentorship::*;
pub use user::*;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Business document stored under `sectionData.<COLLECTION>`
pub trait SectionDocument: DeserializeOwned + Default {
    const COLLECTION: &'static str;
    /// Older documents of this collection keep fields at the top level.
    const MERGES_TOP_LEVEL: bool = false;
}

/// Top-level keys that are document metadata, never business fields
const DOCUMENT_KEYS: [&str; 4] = ["_id", "sectionData", "createdAt", "updatedAt"];

/// A raw document after the one normalization pass.
#[derive(Debug, Clone)]
pub struct Record<T> {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub body: T,
    raw: Value,
}

impl<T: SectionDocument> Record<T> {
    /// Never fails: a malformed section degrades to `T::default()`.
    pub fn from_raw(raw: Value) -> Self {
        let id = raw.get("_id").and_then(id_string).unwrap_or_default();
        let created_at = raw.get("createdAt").and_then(parse_timestamp);

        let section = match raw.get("sectionData").and_then(|s| s.get(T::COLLECTION)) {
            Some(Value::Object(fields)) if T::MERGES_TOP_LEVEL => {
                // campos da seção têm prioridade sobre os legados do topo
                let mut merged = top_level_fields(&raw);
                merged.extend(fields.clone());
                Value::Object(merged)
            }
            Some(section) => section.clone(),
            None => raw.clone(),
        };

        let body = match serde_json::from_value::<T>(section) {
            Ok(body) => body,
            Err(e) => {
                log::warn!("⚠️  Malformed {} document {}: {}", T::COLLECTION, id, e);
                T::default()
            }
        };

        Self { id, created_at, body, raw }
    }

    /// Raw stored value of a section key, looked up where `from_raw` reads it
    pub fn raw_field(&self, key: &str) -> Option<&Value> {
        let section = self.raw.get("sectionData").and_then(|s| s.get(T::COLLECTION));
        match section {
            Some(section) => section
                .get(key)
                .or_else(|| if T::MERGES_TOP_LEVEL { self.raw.get(key) } else { None }),
            None => self.raw.get(key),
        }
    }

    /// Whether `key` is stored under `sectionData.<COLLECTION>`
    pub fn in_section(&self, key: &str) -> bool {
        self.raw
            .get("sectionData")
            .and_then(|s| s.get(T::COLLECTION))
            .and_then(|s| s.get(key))
            .is_some()
    }

    /// First document of a `$lookup` result array named `as_field`
    pub fn joined<J: SectionDocument>(&self, as_field: &str) -> Option<Record<J>> {
        self.raw
            .get(as_field)
            .and_then(|v| v.as_array())
            .and_then(|docs| docs.first())
            .cloned()
            .map(Record::from_raw)
    }
}

fn top_level_fields(raw: &Value) -> Map<String, Value> {
    raw.as_object()
        .map(|doc| {
            doc.iter()
                .filter(|(key, _)| !DOCUMENT_KEYS.contains(&key.as_str()))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect()
        })
        .unwrap_or_default()
}

pub fn normalize_all<T: SectionDocument>(docs: Vec<Value>) -> Vec<Record<T>> {
    docs.into_iter().map(Record::from_raw).collect()
}

/// `"abc"` or `{"$oid": "abc"}`
pub fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Object(map) => map.get("$oid").and_then(|v| v.as_str()).map(String::from),
        _ => None,
    }
}

/// RFC 3339 string, `YYYY-MM-DD`, epoch millis or `{"$date": ...}`
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|d| d.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(|d| Utc.from_utc_datetime(&d))
            }),
        Value::Number(n) => n.as_i64().and_then(|ms| Utc.timestamp_millis_opt(ms).single()),
        Value::Object(map) => map.get("$date").and_then(parse_timestamp),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_section_body_and_flat_fallback() {
        let nested: Record<AppUser> = Record::from_raw(json!({
            "_id": { "$oid": "u1" },
            "createdAt": "2024-03-01T10:00:00Z",
            "sectionData": { "appuser": { "legalname": "Ana" } }
        }));
        assert_eq!(nested.id, "u1");
        assert_eq!(nested.body.legalname.as_deref(), Some("Ana"));
        assert!(nested.created_at.is_some());

        let flat: Record<AppUser> = Record::from_raw(json!({ "_id": "u2", "legalname": "Bo" }));
        assert_eq!(flat.body.legalname.as_deref(), Some("Bo"));
    }

    #[test]
    fn test_malformed_section_degrades_to_default() {
        let record: Record<AppUser> = Record::from_raw(json!({
            "_id": "u3",
            "sectionData": { "appuser": "not an object" }
        }));
        assert_eq!(record.id, "u3");
        assert!(record.body.legalname.is_none());
    }

    #[test]
    fn test_flat_user_keeps_top_level_fields_after_section_write() {
        let record: Record<AppUser> = Record::from_raw(json!({
            "_id": "u4",
            "legalname": "Bo",
            "email": "bo@x.io",
            "certificatesdetails": [{ "certificatename": "AWS" }, { "certificatename": "GCP" }],
            "sectionData": { "appuser": {
                "certificatesdetails": [{ "certificatename": "GCP" }]
            }}
        }));
        assert_eq!(record.body.legalname.as_deref(), Some("Bo"));
        assert_eq!(record.body.email.as_deref(), Some("bo@x.io"));
        assert_eq!(record.body.certificatesdetails.len(), 1);
        assert!(record.in_section("certificatesdetails"));
        assert!(!record.in_section("legalname"));
        assert_eq!(record.raw_field("legalname"), Some(&json!("Bo")));
    }

    #[test]
    fn test_sectioned_collections_ignore_top_level() {
        let job: Record<JobPost> = Record::from_raw(json!({
            "_id": "j2",
            "title": "Stale",
            "sectionData": { "jobpost": {} }
        }));
        assert!(job.body.title.is_none());
        assert!(job.raw_field("title").is_none());
    }

    #[test]
    fn test_joined_lookup() {
        let job: Record<JobPost> = Record::from_raw(json!({
            "_id": "j1",
            "sectionData": { "jobpost": { "title": "Intern" } },
            "company": [{ "_id": "c1", "sectionData": { "Company": { "organizationName": "Acme" } } }]
        }));
        let company = job.joined::<Company>("company").unwrap();
        assert_eq!(company.body.organization_name.as_deref(), Some("Acme"));
        assert!(job.joined::<Company>("missing").is_none());
    }

    #[test]
    fn test_timestamps() {
        assert!(parse_timestamp(&json!("2024-05-01")).is_some());
        assert!(parse_timestamp(&json!({ "$date": 1714521600000i64 })).is_some());
        assert!(parse_timestamp(&json!("yesterday")).is_none());
    }
}
