use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use std::time::Duration;

use super::types::*;
use super::DataGateway;
use crate::utils::metrics;
use crate::config::GatewayConfig;
use crate::utils::{AppError, GatewayError};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client for the remote document API
#[derive(Clone)]
pub struct Gateway {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    db_name: String,
    app_name: String,
}

impl Gateway {
    pub fn new(config: &GatewayConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            db_name: config.db_name.clone(),
            app_name: config.app_name.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn upload_path(&self, module_name: &str) -> String {
        format!(
            "/v1/dynamic/uploadAndStore/upload/{}/{}",
            urlencoding::encode(&self.app_name),
            urlencoding::encode(module_name)
        )
    }

    async fn post_json(
        &self,
        path: &str,
        body: &Value,
        token: Option<&str>,
    ) -> Result<Value, GatewayError> {
        let mut request = self
            .http
            .post(self.url(path))
            .header(API_KEY_HEADER, &self.api_key)
            .json(body);

        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let result = read_json(request.send().await).await;
        metrics::record_gateway_call(result.is_ok());
        result
    }
}

async fn read_json(
    sent: Result<reqwest::Response, reqwest::Error>,
) -> Result<Value, GatewayError> {
    let response = sent.map_err(|e| GatewayError::Transport(e.to_string()))?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| GatewayError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            message: server_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string()),
        });
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| GatewayError::Decode(e.to_string()))
}

/// `message` ou `error` do corpo de erro, quando o backend manda JSON
fn server_message(text: &str) -> Option<String> {
    let body: Value = serde_json::from_str(text).ok()?;
    body.get("message")
        .or_else(|| body.get("error"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(String::from)
}

fn require_token(token: &str) -> Result<&str, GatewayError> {
    if token.trim().is_empty() {
        Err(GatewayError::MissingToken)
    } else {
        Ok(token)
    }
}

/// `{data: [...]}`; a missing or null `data` is an empty result.
pub(crate) fn documents_from(body: Value) -> Result<Vec<Value>, GatewayError> {
    match body {
        Value::Null => Ok(Vec::new()),
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(docs)) => Ok(docs),
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(other) => Err(GatewayError::Decode(format!(
                "expected 'data' array, got {}",
                other
            ))),
        },
        Value::Array(docs) => Ok(docs),
        other => Err(GatewayError::Decode(format!("unexpected body: {}", other))),
    }
}

/// Accepts `{filePath}` or `{data: {filePath}}`.
pub(crate) fn uploaded_file_from(body: &Value) -> Result<UploadedFile, GatewayError> {
    body.get("filePath")
        .or_else(|| body.get("data").and_then(|d| d.get("filePath")))
        .and_then(|p| p.as_str())
        .filter(|p| !p.is_empty())
        .map(|p| UploadedFile { file_path: p.to_string() })
        .ok_or_else(|| GatewayError::Rejected("Upload failed: no file path returned".to_string()))
}

#[async_trait]
impl DataGateway for Gateway {
    async fn fetch_section_data(&self, query: &FetchQuery) -> Result<Vec<Value>, GatewayError> {
        log::debug!("🔎 mfind {}", query.collection_name);

        let body = self
            .post_json("/general/mfind", &query.to_body(&self.db_name), None)
            .await
            .map_err(|e| {
                log::warn!("⚠️  mfind {} failed: {}", query.collection_name, e);
                e
            })?;

        documents_from(body)
    }

    async fn m_update(
        &self,
        command: &UpdateCommand,
        token: &str,
    ) -> Result<UpdateResponse, GatewayError> {
        let token = require_token(token)?;
        log::debug!("✏️  mupdate {} (upsert: {})", command.collection_name, command.options.upsert);

        let body = self
            .post_json("/v1/dynamic/mupdate", &command.to_body(&self.app_name), Some(token))
            .await?;

        let response: UpdateResponse =
            serde_json::from_value(body).map_err(|e| GatewayError::Decode(e.to_string()))?;

        if !response.is_success() {
            let message = response
                .message
                .clone()
                .unwrap_or_else(|| "Update was not applied".to_string());
            log::warn!("⚠️  mupdate {} rejected: {}", command.collection_name, message);
            return Err(GatewayError::Rejected(message));
        }

        Ok(response)
    }

    async fn add_general_data(
        &self,
        collection_name: &str,
        data: &Value,
        token: &str,
    ) -> Result<AddDataResponse, GatewayError> {
        let token = require_token(token)?;
        log::debug!("➕ adddata {}", collection_name);

        let body = serde_json::json!({
            "dbName": self.db_name,
            "collectionName": collection_name,
            "data": data,
        });

        let raw = self.post_json("/general/adddata", &body, Some(token)).await?;
        let response: AddDataResponse =
            serde_json::from_value(raw).map_err(|e| GatewayError::Decode(e.to_string()))?;

        if !response.is_success() {
            return Err(GatewayError::Rejected(
                response.message.unwrap_or_else(|| "Document was not created".to_string()),
            ));
        }

        Ok(response)
    }

    async fn upload_and_store_file(
        &self,
        module_name: &str,
        file: FileUpload,
        user_id: &str,
        token: &str,
    ) -> Result<UploadedFile, GatewayError> {
        let token = require_token(token)?;
        if file.bytes.is_empty() {
            return Err(GatewayError::MissingFile);
        }

        log::debug!("📤 upload {} ({} bytes) to {}", file.file_name, file.bytes.len(), module_name);

        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(|e| GatewayError::Transport(format!("Invalid content type: {}", e)))?;

        let form = Form::new()
            .part("file", part)
            .text("user_id", user_id.to_string())
            .text("folderName", module_name.to_string());

        let sent = self
            .http
            .post(self.url(&self.upload_path(module_name)))
            .header(API_KEY_HEADER, &self.api_key)
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await;

        let result = read_json(sent).await;
        metrics::record_gateway_call(result.is_ok());

        uploaded_file_from(&result?)
    }

    async fn auth_request(&self, flow: AuthFlow, body: &Value) -> Result<Value, GatewayError> {
        log::debug!("🔐 auth {}", flow.path());
        self.post_json(flow.path(), body, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gateway() -> Gateway {
        Gateway::new(&GatewayConfig {
            base_url: "https://api.example.com".into(),
            api_key: "k".into(),
            db_name: "portal".into(),
            app_name: "intern portal".into(),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[test]
    fn test_documents_from_shapes() {
        assert_eq!(documents_from(json!({ "data": [{ "_id": "a" }] })).unwrap().len(), 1);
        assert!(documents_from(json!({ "data": null })).unwrap().is_empty());
        assert!(documents_from(json!({})).unwrap().is_empty());
        assert!(documents_from(Value::Null).unwrap().is_empty());
        assert!(matches!(
            documents_from(json!({ "data": "oops" })),
            Err(GatewayError::Decode(_))
        ));
    }

    #[test]
    fn test_uploaded_file_from() {
        let direct = uploaded_file_from(&json!({ "filePath": "profile/u1.png" })).unwrap();
        assert_eq!(direct.file_path, "profile/u1.png");
        let nested = uploaded_file_from(&json!({ "data": { "filePath": "logo/c1.png" } })).unwrap();
        assert_eq!(nested.file_path, "logo/c1.png");
        assert!(uploaded_file_from(&json!({ "success": true })).is_err());
    }

    #[test]
    fn test_server_message() {
        assert_eq!(server_message(r#"{"message":"Invalid OTP"}"#).as_deref(), Some("Invalid OTP"));
        assert_eq!(server_message(r#"{"error":"Denied"}"#).as_deref(), Some("Denied"));
        assert_eq!(server_message("<html>"), None);
    }

    #[test]
    fn test_upload_path_is_encoded() {
        assert_eq!(
            gateway().upload_path("profile pictures"),
            "/v1/dynamic/uploadAndStore/upload/intern%20portal/profile%20pictures"
        );
    }

    #[tokio::test]
    async fn test_writes_without_token_fail_before_network() {
        let gw = gateway();
        let command = UpdateCommand {
            collection_name: "appuser".into(),
            query: json!({}),
            update: json!({ "$set": { "a": 1 } }),
            options: UpdateOptions::default(),
        };
        assert_eq!(gw.m_update(&command, "").await, Err(GatewayError::MissingToken));

        let empty = FileUpload {
            file_name: "a.png".into(),
            content_type: "image/png".into(),
            bytes: vec![],
        };
        assert_eq!(
            gw.upload_and_store_file("profile", empty, "u1", "t").await,
            Err(GatewayError::MissingFile)
        );
    }
}
