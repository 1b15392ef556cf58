use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Sort direction understood by `/general/mfind`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

/// `$lookup` stage executed by the remote API before returning documents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lookup {
    pub from: String,
    #[serde(rename = "localField")]
    pub local_field: String,
    #[serde(rename = "foreignField")]
    pub foreign_field: String,
    #[serde(rename = "as")]
    pub as_field: String,
}

impl Lookup {
    pub fn new(from: &str, local_field: &str, foreign_field: &str, as_field: &str) -> Self {
        Self {
            from: from.to_string(),
            local_field: local_field.to_string(),
            foreign_field: foreign_field.to_string(),
            as_field: as_field.to_string(),
        }
    }
}

/// Query for `/general/mfind`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchQuery {
    pub collection_name: String,
    pub query: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sorted_by: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lookups: Vec<Lookup>,
}

impl FetchQuery {
    pub fn new(collection_name: &str) -> Self {
        Self {
            collection_name: collection_name.to_string(),
            query: Value::Object(Default::default()),
            projection: None,
            limit: None,
            order: None,
            sorted_by: None,
            lookups: Vec::new(),
        }
    }

    pub fn filter(mut self, query: Value) -> Self {
        self.query = query;
        self
    }

    pub fn projection(mut self, projection: Value) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sorted_by(mut self, field: &str, order: SortOrder) -> Self {
        self.sorted_by = Some(field.to_string());
        self.order = Some(order);
        self
    }

    pub fn lookup(mut self, lookup: Lookup) -> Self {
        self.lookups.push(lookup);
        self
    }

    /// Request body with the tenant database name merged in
    pub fn to_body(&self, db_name: &str) -> Value {
        let mut body = serde_json::to_value(self).unwrap_or_else(|_| Value::Object(Default::default()));
        if let Value::Object(map) = &mut body {
            map.insert("dbName".to_string(), Value::String(db_name.to_string()));
        }
        body
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UpdateOptions {
    pub upsert: bool,
}

/// Mongo-style update sent to `/v1/dynamic/mupdate`; `appName` is added by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommand {
    pub collection_name: String,
    pub query: Value,
    pub update: Value,
    pub options: UpdateOptions,
}

impl UpdateCommand {
    pub fn to_body(&self, app_name: &str) -> Value {
        serde_json::json!({
            "appName": app_name,
            "collectionName": self.collection_name,
            "query": self.query,
            "update": self.update,
            "options": self.options,
        })
    }
}

/// Raw mupdate response. The backend is inconsistent about which of these it sets.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct UpdateResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(rename = "modifiedCount", default)]
    pub modified_count: Option<u64>,
    #[serde(rename = "matchedCount", default)]
    pub matched_count: Option<u64>,
    #[serde(rename = "upsertedId", default)]
    pub upserted_id: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl UpdateResponse {
    /// Single success predicate used for every write
    pub fn is_success(&self) -> bool {
        self.success == Some(true)
            || self.modified_count.unwrap_or(0) > 0
            || self.matched_count.unwrap_or(0) > 0
            || self.upserted_id.as_ref().map_or(false, |id| !id.is_null())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AddDataResponse {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(rename = "insertedId", alias = "_id", default)]
    pub inserted_id: Option<Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AddDataResponse {
    pub fn is_success(&self) -> bool {
        self.success == Some(true) || self.inserted_id.as_ref().map_or(false, |id| !id.is_null())
    }

    pub fn inserted_id_string(&self) -> Option<String> {
        match self.inserted_id.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Object(map) => map.get("$oid").and_then(|v| v.as_str()).map(String::from),
            _ => None,
        }
    }
}

/// File handed to `uploadAndStore`
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedFile {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

/// Credential flows exposed under `/v1/auth`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFlow {
    SignupOtp,
    Signup,
    VerifyOtp,
    Login,
    ForgotPassword,
    ResetPassword,
}

impl AuthFlow {
    pub fn path(&self) -> &'static str {
        match self {
            AuthFlow::SignupOtp => "/v1/auth/signup/otp",
            AuthFlow::Signup => "/v1/auth/hana/signup",
            AuthFlow::VerifyOtp => "/v1/auth/verify-otp",
            AuthFlow::Login => "/v1/auth/login",
            AuthFlow::ForgotPassword => "/v1/auth/forgot-password",
            AuthFlow::ResetPassword => "/v1/auth/reset-password",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fetch_body_shape() {
        let body = FetchQuery::new("jobpost")
            .filter(json!({ "sectionData.jobpost.status": "open" }))
            .limit(50)
            .sorted_by("createdAt", SortOrder::Desc)
            .lookup(Lookup::new("Company", "sectionData.jobpost.companyId", "_id", "company"))
            .to_body("portal");

        assert_eq!(body["dbName"], "portal");
        assert_eq!(body["collectionName"], "jobpost");
        assert_eq!(body["limit"], 50);
        assert_eq!(body["order"], "desc");
        assert_eq!(body["sortedBy"], "createdAt");
        assert_eq!(body["lookups"][0]["localField"], "sectionData.jobpost.companyId");
        assert_eq!(body["lookups"][0]["as"], "company");
        assert!(body.get("projection").is_none());

        let hidden = FetchQuery::new("appuser")
            .projection(json!({ "password": 0 }))
            .to_body("portal");
        assert_eq!(hidden["projection"], json!({ "password": 0 }));
    }

    #[test]
    fn test_success_predicate() {
        let parse = |v: Value| serde_json::from_value::<UpdateResponse>(v).unwrap();

        assert!(parse(json!({ "success": true })).is_success());
        assert!(parse(json!({ "modifiedCount": 1 })).is_success());
        assert!(parse(json!({ "matchedCount": 1, "modifiedCount": 0 })).is_success());
        assert!(parse(json!({ "upsertedId": "abc" })).is_success());
        assert!(!parse(json!({ "success": false, "modifiedCount": 0 })).is_success());
        assert!(!parse(json!({ "upsertedId": null })).is_success());
        assert!(!parse(json!({})).is_success());
    }

    #[test]
    fn test_update_body_carries_app_name() {
        let command = UpdateCommand {
            collection_name: "appuser".into(),
            query: json!({ "_id": "u1" }),
            update: json!({ "$set": { "sectionData.appuser.legalname": "Ana" } }),
            options: UpdateOptions { upsert: false },
        };
        let body = command.to_body("portal");
        assert_eq!(body["appName"], "portal");
        assert_eq!(body["options"]["upsert"], false);
    }

    #[test]
    fn test_inserted_id_forms() {
        let plain: AddDataResponse = serde_json::from_value(json!({ "insertedId": "j1" })).unwrap();
        assert_eq!(plain.inserted_id_string().as_deref(), Some("j1"));
        let oid: AddDataResponse =
            serde_json::from_value(json!({ "insertedId": { "$oid": "j2" } })).unwrap();
        assert_eq!(oid.inserted_id_string().as_deref(), Some("j2"));
    }
}
