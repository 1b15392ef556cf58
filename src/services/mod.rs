pub mod auth_service;
pub mod company_service;
pub mod job_service;
pub mod lifecycle;
pub mod listing;
pub mod mentor_service;
pub mod mentorship_service;
pub mod patch;
pub mod profile_service;
pub mod upload;
pub mod validation;

use serde::Serialize;

/// Response of `adddata`-backed creations
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResponse {
    pub success: bool,
    pub id: Option<String>,
}
