//! In-memory gateway for service and handler tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

use super::types::*;
use super::DataGateway;
use crate::utils::GatewayError;

#[derive(Default)]
pub struct FakeGateway {
    collections: Mutex<HashMap<String, Vec<Value>>>,
    fail_reads: Mutex<Option<GatewayError>>,
    update_response: Mutex<Option<Value>>,
    on_update: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
    auth_responses: Mutex<HashMap<&'static str, Result<Value, GatewayError>>>,
    pub fetches: Mutex<Vec<FetchQuery>>,
    pub updates: Mutex<Vec<UpdateCommand>>,
    pub inserts: Mutex<Vec<(String, Value)>>,
    pub uploads: Mutex<Vec<(String, String, String)>>,
    pub auth_calls: Mutex<Vec<(AuthFlow, Value)>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(self, collection: &str, docs: Vec<Value>) -> Self {
        self.collections
            .lock()
            .unwrap()
            .insert(collection.to_string(), docs);
        self
    }

    pub fn failing_reads(self, error: GatewayError) -> Self {
        *self.fail_reads.lock().unwrap() = Some(error);
        self
    }

    pub fn with_update_response(self, response: Value) -> Self {
        *self.update_response.lock().unwrap() = Some(response);
        self
    }

    /// Runs while an update is in flight, before it resolves
    pub fn on_update(self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        *self.on_update.lock().unwrap() = Some(Box::new(hook));
        self
    }

    pub fn with_auth_response(self, flow: AuthFlow, response: Result<Value, GatewayError>) -> Self {
        self.auth_responses
            .lock()
            .unwrap()
            .insert(flow.path(), response);
        self
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn last_update(&self) -> Option<UpdateCommand> {
        self.updates.lock().unwrap().last().cloned()
    }

    pub fn last_fetch(&self) -> Option<FetchQuery> {
        self.fetches.lock().unwrap().last().cloned()
    }
}

/// Minimal equality matcher: every `key: value` pair of the filter must match
/// the document at that dotted path. Operators are ignored.
fn matches_filter(doc: &Value, filter: &Value) -> bool {
    let Some(filter) = filter.as_object() else {
        return true;
    };
    filter.iter().all(|(path, expected)| {
        if path.starts_with('$') || expected.is_object() {
            return true;
        }
        let mut current = doc;
        for part in path.split('.') {
            match current.get(part) {
                Some(next) => current = next,
                None => return false,
            }
        }
        current == expected
    })
}

#[async_trait]
impl DataGateway for FakeGateway {
    async fn fetch_section_data(&self, query: &FetchQuery) -> Result<Vec<Value>, GatewayError> {
        self.fetches.lock().unwrap().push(query.clone());
        if let Some(err) = self.fail_reads.lock().unwrap().clone() {
            return Err(err);
        }
        let docs = self
            .collections
            .lock()
            .unwrap()
            .get(&query.collection_name)
            .cloned()
            .unwrap_or_default();
        Ok(docs
            .into_iter()
            .filter(|doc| matches_filter(doc, &query.query))
            .collect())
    }

    async fn m_update(
        &self,
        command: &UpdateCommand,
        token: &str,
    ) -> Result<UpdateResponse, GatewayError> {
        if token.is_empty() {
            return Err(GatewayError::MissingToken);
        }
        self.updates.lock().unwrap().push(command.clone());
        if let Some(hook) = self.on_update.lock().unwrap().as_ref() {
            hook();
        }
        let raw = self
            .update_response
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| json!({ "success": true, "modifiedCount": 1 }));
        let response: UpdateResponse = serde_json::from_value(raw).unwrap();
        if response.is_success() {
            Ok(response)
        } else {
            Err(GatewayError::Rejected(
                response.message.unwrap_or_else(|| "Update was not applied".into()),
            ))
        }
    }

    async fn add_general_data(
        &self,
        collection_name: &str,
        data: &Value,
        token: &str,
    ) -> Result<AddDataResponse, GatewayError> {
        if token.is_empty() {
            return Err(GatewayError::MissingToken);
        }
        let mut inserts = self.inserts.lock().unwrap();
        inserts.push((collection_name.to_string(), data.clone()));
        Ok(AddDataResponse {
            success: Some(true),
            inserted_id: Some(json!(format!("new-{}", inserts.len()))),
            message: None,
        })
    }

    async fn upload_and_store_file(
        &self,
        module_name: &str,
        file: FileUpload,
        user_id: &str,
        token: &str,
    ) -> Result<UploadedFile, GatewayError> {
        if token.is_empty() {
            return Err(GatewayError::MissingToken);
        }
        if file.bytes.is_empty() {
            return Err(GatewayError::MissingFile);
        }
        self.uploads.lock().unwrap().push((
            module_name.to_string(),
            file.file_name.clone(),
            user_id.to_string(),
        ));
        Ok(UploadedFile {
            file_path: format!("{}/{}/{}", module_name, user_id, file.file_name),
        })
    }

    async fn auth_request(&self, flow: AuthFlow, body: &Value) -> Result<Value, GatewayError> {
        self.auth_calls.lock().unwrap().push((flow, body.clone()));
        self.auth_responses
            .lock()
            .unwrap()
            .get(flow.path())
            .cloned()
            .unwrap_or_else(|| Ok(json!({ "success": true })))
    }
}
