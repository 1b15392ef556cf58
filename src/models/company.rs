use serde::Deserialize;

use super::de::{lenient_string, string_or_list};
use super::SectionDocument;

/// Documento da collection "Company" (perfil da empresa contratante)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Company {
    #[serde(rename = "organizationName", default, deserialize_with = "lenient_string")]
    pub organization_name: Option<String>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub industry: Vec<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub noofemployees: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
}

impl SectionDocument for Company {
    const COLLECTION: &'static str = "Company";
}
