use base64::Engine;
use serde::Deserialize;

use crate::gateway::FileUpload;
use crate::utils::AppError;

/// Arquivo enviado pelo cliente como JSON
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadRequest {
    pub file_name: String,
    #[serde(default)]
    pub content_type: Option<String>,
    pub data_base64: String,
}

impl UploadRequest {
    /// Accepts plain base64 or a `data:<mime>;base64,` URL.
    pub fn into_file_upload(self) -> Result<FileUpload, AppError> {
        let (mime_from_url, payload) = match self.data_base64.split_once(";base64,") {
            Some((prefix, data)) => (prefix.strip_prefix("data:").map(String::from), data.to_string()),
            None => (None, self.data_base64),
        };

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::InvalidRequest(format!("file is not valid base64: {}", e)))?;

        let file_name = self.file_name.trim().to_string();
        if file_name.is_empty() {
            return Err(AppError::InvalidRequest("fileName is required".to_string()));
        }

        Ok(FileUpload {
            content_type: self
                .content_type
                .or(mime_from_url)
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            file_name,
            bytes,
        })
    }
}
