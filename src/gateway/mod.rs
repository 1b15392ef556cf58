// ==================== REMOTE DATA GATEWAY ====================
// Único ponto de acesso à API de documentos (mfind / adddata / mupdate / upload / auth).
// Serviços dependem do trait, não do cliente HTTP, para poder testar sem rede.

pub mod client;
pub mod types;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde_json::Value;

use crate::utils::GatewayError;

pub use client::Gateway;
pub use types::*;

#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Documents matching `query`; `Ok(vec![])` means "no results", never "failed".
    async fn fetch_section_data(&self, query: &FetchQuery) -> Result<Vec<Value>, GatewayError>;

    /// Applies an update. Responses failing `UpdateResponse::is_success` are `Rejected`.
    async fn m_update(
        &self,
        command: &UpdateCommand,
        token: &str,
    ) -> Result<UpdateResponse, GatewayError>;

    async fn add_general_data(
        &self,
        collection_name: &str,
        data: &Value,
        token: &str,
    ) -> Result<AddDataResponse, GatewayError>;

    async fn upload_and_store_file(
        &self,
        module_name: &str,
        file: FileUpload,
        user_id: &str,
        token: &str,
    ) -> Result<UploadedFile, GatewayError>;

    /// Credential flows; the raw response body is returned on 2xx.
    async fn auth_request(&self, flow: AuthFlow, body: &Value) -> Result<Value, GatewayError>;
}
