use serde::Deserialize;

use super::de::lenient_string;
use super::SectionDocument;

/// Candidatura: liga um usuário a uma vaga (upsert por userId + jobId)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Application {
    #[serde(rename = "jobId", default, deserialize_with = "lenient_string")]
    pub job_id: Option<String>,
    #[serde(rename = "appliedAt", default, deserialize_with = "lenient_string")]
    pub applied_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub status: Option<String>,
}

impl SectionDocument for Application {
    const COLLECTION: &'static str = "application";
}
