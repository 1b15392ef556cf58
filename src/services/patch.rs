// Builder tipado para updates parciais. Os caminhos "sectionData.<collection>.<campo>"
// só existem na serialização; o resto do código fala em enums de campo.

use serde::Serialize;
use serde_json::{Map, Value};
use std::marker::PhantomData;

use crate::gateway::{UpdateCommand, UpdateOptions};
use crate::models::{AppUser, Application, Company, JobPost, Mentorship, SectionDocument};
use crate::utils::AppError;

pub trait EntityField: Copy {
    const COLLECTION: &'static str;

    /// Wire name of the field inside the section
    fn key(&self) -> &'static str;

    fn path(&self) -> String {
        format!("sectionData.{}.{}", Self::COLLECTION, self.key())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    LegalName,
    Email,
    Mobile,
    Gender,
    Profile,
    Role,
    About,
    MentorExpertise,
    Certificates,
    Projects,
    Achievements,
    Responsibilities,
    MentorAvailability,
}

impl EntityField for UserField {
    const COLLECTION: &'static str = AppUser::COLLECTION;

    fn key(&self) -> &'static str {
        match self {
            UserField::LegalName => "legalname",
            UserField::Email => "email",
            UserField::Mobile => "mobile",
            UserField::Gender => "Gender",
            UserField::Profile => "profile",
            UserField::Role => "role",
            UserField::About => "about",
            UserField::MentorExpertise => "mentorExpertise",
            UserField::Certificates => "certificatesdetails",
            UserField::Projects => "projectdetails",
            UserField::Achievements => "achievementsdetails",
            UserField::Responsibilities => "responsibilitydetails",
            UserField::MentorAvailability => "mentorAvailability",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompanyField {
    OrganizationName,
    Industry,
    Employees,
    Logo,
    Website,
    Location,
    Description,
    UserId,
}

impl EntityField for CompanyField {
    const COLLECTION: &'static str = Company::COLLECTION;

    fn key(&self) -> &'static str {
        match self {
            CompanyField::OrganizationName => "organizationName",
            CompanyField::Industry => "industry",
            CompanyField::Employees => "noofemployees",
            CompanyField::Logo => "logo",
            CompanyField::Website => "website",
            CompanyField::Location => "location",
            CompanyField::Description => "description",
            CompanyField::UserId => "userId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobField {
    Title,
    CompanyId,
}

impl EntityField for JobField {
    const COLLECTION: &'static str = JobPost::COLLECTION;

    fn key(&self) -> &'static str {
        match self {
            JobField::Title => "title",
            JobField::CompanyId => "companyId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MentorshipField {
    MentorId,
}

impl EntityField for MentorshipField {
    const COLLECTION: &'static str = Mentorship::COLLECTION;

    fn key(&self) -> &'static str {
        match self {
            MentorshipField::MentorId => "mentorId",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationField {
    UserId,
    JobId,
    AppliedAt,
    Status,
}

impl EntityField for ApplicationField {
    const COLLECTION: &'static str = Application::COLLECTION;

    fn key(&self) -> &'static str {
        match self {
            ApplicationField::UserId => "userId",
            ApplicationField::JobId => "jobId",
            ApplicationField::AppliedAt => "appliedAt",
            ApplicationField::Status => "status",
        }
    }
}

/// Equality filter on section fields
pub fn field_filter<F: EntityField>(pairs: Vec<(F, Value)>) -> Value {
    let map: Map<String, Value> = pairs
        .into_iter()
        .map(|(field, value)| (field.path(), value))
        .collect();
    Value::Object(map)
}

/// Filter on the document id
pub fn id_filter(id: &str) -> Value {
    serde_json::json!({ "_id": id })
}

/// `{"sectionData": {<collection>: body}}`, the shape `adddata` stores
pub fn section_document<F: EntityField, V: Serialize>(body: V) -> Result<Value, AppError> {
    let body = serde_json::to_value(body)
        .map_err(|e| AppError::InvalidRequest(format!("cannot encode {}: {}", F::COLLECTION, e)))?;
    let mut section = Map::new();
    section.insert(F::COLLECTION.to_string(), body);
    let mut doc = Map::new();
    doc.insert("sectionData".to_string(), Value::Object(section));
    Ok(Value::Object(doc))
}

#[derive(Debug, Clone)]
pub struct Patch<F: EntityField> {
    set: Map<String, Value>,
    push: Map<String, Value>,
    unset: Map<String, Value>,
    error: Option<String>,
    _field: PhantomData<F>,
}

impl<F: EntityField> Default for Patch<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: EntityField> Patch<F> {
    pub fn new() -> Self {
        Self {
            set: Map::new(),
            push: Map::new(),
            unset: Map::new(),
            error: None,
            _field: PhantomData,
        }
    }

    fn encode<V: Serialize>(&mut self, field: F, value: V) -> Option<Value> {
        match serde_json::to_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                self.error = Some(format!("cannot encode '{}': {}", field.key(), e));
                None
            }
        }
    }

    pub fn set<V: Serialize>(mut self, field: F, value: V) -> Self {
        if let Some(v) = self.encode(field, value) {
            self.set.insert(field.path(), v);
        }
        self
    }

    pub fn set_if_some<V: Serialize>(self, field: F, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(field, v),
            None => self,
        }
    }

    pub fn push<V: Serialize>(mut self, field: F, value: V) -> Self {
        if let Some(v) = self.encode(field, value) {
            self.push.insert(field.path(), v);
        }
        self
    }

    pub fn unset(mut self, field: F) -> Self {
        self.unset.insert(field.path(), Value::String(String::new()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty() && self.push.is_empty() && self.unset.is_empty()
    }

    /// `{"$set": .., "$push": .., "$unset": ..}` with empty operators omitted
    pub fn into_update(self) -> Result<Value, AppError> {
        if let Some(e) = self.error {
            return Err(AppError::InvalidRequest(e));
        }
        if self.is_empty() {
            return Err(AppError::InvalidRequest("nothing to update".to_string()));
        }

        let mut update = Map::new();
        if !self.set.is_empty() {
            update.insert("$set".to_string(), Value::Object(self.set));
        }
        if !self.push.is_empty() {
            update.insert("$push".to_string(), Value::Object(self.push));
        }
        if !self.unset.is_empty() {
            update.insert("$unset".to_string(), Value::Object(self.unset));
        }
        Ok(Value::Object(update))
    }

    pub fn into_command(self, query: Value, upsert: bool) -> Result<UpdateCommand, AppError> {
        Ok(UpdateCommand {
            collection_name: F::COLLECTION.to_string(),
            query,
            update: self.into_update()?,
            options: UpdateOptions { upsert },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Certificate;
    use serde_json::json;

    #[test]
    fn test_set_and_push_paths() {
        let update = Patch::new()
            .set(UserField::LegalName, "Ana")
            .set_if_some(UserField::Gender, None::<String>)
            .push(
                UserField::Certificates,
                Certificate {
                    certificatename: Some("AWS".into()),
                    ..Default::default()
                },
            )
            .into_update()
            .unwrap();

        assert_eq!(
            update,
            json!({
                "$set": { "sectionData.appuser.legalname": "Ana" },
                "$push": { "sectionData.appuser.certificatesdetails": { "certificatename": "AWS" } }
            })
        );
    }

    #[test]
    fn test_empty_patch_is_rejected() {
        let err = Patch::<CompanyField>::new().into_update().unwrap_err();
        assert!(matches!(err, AppError::InvalidRequest(_)));
    }

    #[test]
    fn test_command_targets_entity_collection() {
        let command = Patch::new()
            .set(CompanyField::OrganizationName, "Acme")
            .unset(CompanyField::Logo)
            .into_command(id_filter("c1"), true)
            .unwrap();
        assert_eq!(command.collection_name, "Company");
        assert!(command.options.upsert);
        assert_eq!(command.update["$unset"]["sectionData.Company.logo"], "");
    }

    #[test]
    fn test_section_document_wraps_body() {
        let doc = section_document::<MentorshipField, _>(json!({ "title": "Rust" })).unwrap();
        assert_eq!(doc, json!({ "sectionData": { "mentorship": { "title": "Rust" } } }));
    }

    #[test]
    fn test_field_filter() {
        let filter = field_filter(vec![
            (ApplicationField::UserId, json!("u1")),
            (ApplicationField::JobId, json!("j1")),
        ]);
        assert_eq!(
            filter,
            json!({ "sectionData.application.userId": "u1", "sectionData.application.jobId": "j1" })
        );
    }
}
