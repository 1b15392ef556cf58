// Desserializadores tolerantes: os documentos remotos não têm schema,
// o mesmo campo chega como string, número, lista ou null dependendo da tela que o gravou.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// "20,000", "₹ 15000", 15000 and 15000.5 all become numbers
pub fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse().ok()
        }
        _ => None,
    }
}

pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(scalar_to_string))
}

pub fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_amount))
}

/// Comma separated string or array, trimmed, empties dropped
pub fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => split_list(&s),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(scalar_to_string)
            .collect(),
        _ => Vec::new(),
    })
}

pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Array of `T`, with null/missing as empty and malformed entries skipped
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match serde_json::from_value(item) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    log::warn!("⚠️  Skipping malformed list entry: {}", e);
                    None
                }
            })
            .collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Deserialize, Debug, Default)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient_string")]
        name: Option<String>,
        #[serde(default, deserialize_with = "lenient_number")]
        salary: Option<f64>,
        #[serde(default, deserialize_with = "string_or_list")]
        skills: Vec<String>,
    }

    #[test]
    fn test_string_and_array_skills() {
        let a: Sample = serde_json::from_value(json!({ "skills": "Rust, SQL ,, Go" })).unwrap();
        assert_eq!(a.skills, vec!["Rust", "SQL", "Go"]);
        let b: Sample = serde_json::from_value(json!({ "skills": [" Rust ", "", 3] })).unwrap();
        assert_eq!(b.skills, vec!["Rust", "3"]);
        let c: Sample = serde_json::from_value(json!({ "skills": null })).unwrap();
        assert!(c.skills.is_empty());
    }

    #[test]
    fn test_amounts() {
        let p: Sample = serde_json::from_value(json!({ "salary": "₹ 20,000" })).unwrap();
        assert_eq!(p.salary, Some(20000.0));
        let q: Sample = serde_json::from_value(json!({ "salary": "negotiable" })).unwrap();
        assert_eq!(q.salary, None);
    }

    #[test]
    fn test_blank_and_numeric_strings() {
        let p: Sample = serde_json::from_value(json!({ "name": "   " })).unwrap();
        assert_eq!(p.name, None);
        let q: Sample = serde_json::from_value(json!({ "name": 42 })).unwrap();
        assert_eq!(q.name.as_deref(), Some("42"));
        let r: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(r.name, None);
    }
}
