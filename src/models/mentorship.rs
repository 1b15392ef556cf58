use serde::Deserialize;

use super::de::lenient_string;
use super::SectionDocument;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Mentorship {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub focus_area: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub deadline: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(rename = "createdAt", default, deserialize_with = "lenient_string")]
    pub created_at: Option<String>,
}

impl SectionDocument for Mentorship {
    const COLLECTION: &'static str = "mentorship";
}
