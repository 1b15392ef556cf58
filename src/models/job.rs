use serde::Deserialize;

use super::de::{lenient_number, lenient_string, string_or_list};
use super::SectionDocument;

/// Vaga de estágio publicada por uma empresa
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPost {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub skillsrequired: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub jobtype: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

impl SectionDocument for JobPost {
    const COLLECTION: &'static str = "jobpost";
}
