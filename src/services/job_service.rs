// Vagas de estágio: listagem com $lookup da empresa, detalhe, criação e candidaturas.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::gateway::{DataGateway, FetchQuery, Lookup, SortOrder};
use crate::models::de::{lenient_number, string_or_list};
use crate::models::{normalize_all, Application, Company, JobPost, Record, SectionDocument};
use crate::services::listing::{sort_and_paginate, Page, SortKey};
use crate::services::patch::{
    field_filter, id_filter, section_document, ApplicationField, EntityField, JobField, Patch,
};
use crate::services::{company_service, validation, CreatedResponse};
use crate::session::{Role, Session};
use crate::utils::AppError;
use crate::views::{ApplicationView, JobCard, JobDetailView, COMPANY_JOIN, JOB_JOIN};

pub const DEFAULT_APPLICATION_STATUS: &str = "Applied";

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct JobPostForm {
    pub title: String,
    pub location: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub skillsrequired: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub jobtype: Option<String>,
}

/// Section body written by `adddata`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct NewJobPost<'a> {
    title: &'a str,
    location: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    salary: Option<f64>,
    #[serde(rename = "skillsrequired")]
    skills_required: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration: Option<&'a str>,
    #[serde(rename = "jobtype", skip_serializing_if = "Option::is_none")]
    job_type: Option<&'a str>,
    company_id: &'a str,
    created_at: String,
}

fn with_company(query: FetchQuery) -> FetchQuery {
    query.lookup(Lookup::new(
        Company::COLLECTION,
        &JobField::CompanyId.path(),
        "_id",
        COMPANY_JOIN,
    ))
}

pub async fn list_jobs(
    gateway: &dyn DataGateway,
    sort: SortKey,
    page: usize,
    page_size: usize,
) -> Result<Page<JobCard>, AppError> {
    let query = with_company(FetchQuery::new(JobPost::COLLECTION));
    let docs = gateway.fetch_section_data(&query).await?;

    let cards: Vec<JobCard> = normalize_all::<JobPost>(docs).iter().map(JobCard::from).collect();
    log::debug!("📋 {} job posts loaded", cards.len());
    Ok(sort_and_paginate(cards, sort, page, page_size))
}

async fn fetch_job(gateway: &dyn DataGateway, job_id: &str) -> Result<Record<JobPost>, AppError> {
    let query = with_company(FetchQuery::new(JobPost::COLLECTION).filter(id_filter(job_id))).limit(1);
    gateway
        .fetch_section_data(&query)
        .await?
        .into_iter()
        .next()
        .map(Record::from_raw)
        .ok_or_else(|| AppError::NotFound(format!("internship {}", job_id)))
}

pub async fn get_job(gateway: &dyn DataGateway, job_id: &str) -> Result<JobDetailView, AppError> {
    Ok(JobDetailView::from(&fetch_job(gateway, job_id).await?))
}

/// Company users only; the post is linked to the caller's company document.
pub async fn create_job(
    gateway: &dyn DataGateway,
    session: &Session,
    form: &JobPostForm,
) -> Result<CreatedResponse, AppError> {
    session.require_role(&[Role::Company])?;
    validation::validate_job_post(form)?;

    let company = company_service::get_company(gateway, session)
        .await?
        .ok_or_else(|| {
            AppError::Validation("Please complete your company profile before posting an internship".to_string())
        })?;

    let section = NewJobPost {
        title: form.title.trim(),
        location: form.location.trim(),
        salary: form.salary,
        skills_required: &form.skillsrequired,
        description: form.description.as_deref(),
        duration: form.duration.as_deref(),
        job_type: form.jobtype.as_deref(),
        company_id: &company.id,
        created_at: Utc::now().to_rfc3339(),
    };
    let data = section_document::<JobField, _>(section)?;

    let response = gateway
        .add_general_data(JobPost::COLLECTION, &data, &session.access_token)
        .await?;

    let id = response.inserted_id_string();
    log::info!("📝 Internship '{}' posted by {} ({:?})", form.title.trim(), session.user_id, id);
    Ok(CreatedResponse { success: true, id })
}

/// Upsert keyed by (userId, jobId): applying twice refreshes `appliedAt`.
pub async fn apply(gateway: &dyn DataGateway, session: &Session, job_id: &str) -> Result<(), AppError> {
    session.require_role(&[Role::Student])?;
    fetch_job(gateway, job_id).await?;

    let command = Patch::new()
        .set(ApplicationField::UserId, &session.user_id)
        .set(ApplicationField::JobId, job_id)
        .set(ApplicationField::AppliedAt, Utc::now().to_rfc3339())
        .set(ApplicationField::Status, DEFAULT_APPLICATION_STATUS)
        .into_command(
            field_filter(vec![
                (ApplicationField::UserId, json!(session.user_id)),
                (ApplicationField::JobId, json!(job_id)),
            ]),
            true,
        )?;
    gateway.m_update(&command, &session.access_token).await?;

    log::info!("📨 User {} applied to {}", session.user_id, job_id);
    Ok(())
}

pub async fn my_applications(
    gateway: &dyn DataGateway,
    session: &Session,
) -> Result<Vec<ApplicationView>, AppError> {
    let query = FetchQuery::new(Application::COLLECTION)
        .filter(field_filter(vec![(ApplicationField::UserId, Value::String(session.user_id.clone()))]))
        .sorted_by(&ApplicationField::AppliedAt.path(), SortOrder::Desc)
        .lookup(Lookup::new(
            JobPost::COLLECTION,
            &ApplicationField::JobId.path(),
            "_id",
            JOB_JOIN,
        ));

    let docs = gateway.fetch_section_data(&query).await?;
    Ok(normalize_all::<Application>(docs).iter().map(ApplicationView::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;

    fn job(id: &str, title: &str, salary: Value) -> Value {
        json!({ "_id": id, "sectionData": { "jobpost": { "title": title, "salary": salary } } })
    }

    fn session(role: Role) -> Session {
        Session {
            user_id: "u1".into(),
            role,
            email: None,
            access_token: "token".into(),
        }
    }

    #[tokio::test]
    async fn test_list_sorted_by_salary_desc() {
        let gateway = FakeGateway::new().with_documents(
            "jobpost",
            vec![job("a", "A", json!(0)), job("b", "B", json!("50,000")), job("c", "C", json!(20000))],
        );
        let page = list_jobs(&gateway, SortKey::SalaryDesc, 1, 6).await.unwrap();
        let salaries: Vec<f64> = page.items.iter().map(|c| c.salary).collect();
        assert_eq!(salaries, vec![50000.0, 20000.0, 0.0]);

        let lookups = gateway.last_fetch().unwrap().lookups;
        assert_eq!(lookups[0].local_field, "sectionData.jobpost.companyId");
        assert_eq!(lookups[0].as_field, "company");
    }

    #[tokio::test]
    async fn test_list_paginates() {
        let docs = (0..13).map(|i| job(&format!("j{}", i), "T", json!(i))).collect();
        let gateway = FakeGateway::new().with_documents("jobpost", docs);
        let sizes = [
            list_jobs(&gateway, SortKey::Date, 1, 6).await.unwrap().items.len(),
            list_jobs(&gateway, SortKey::Date, 2, 6).await.unwrap().items.len(),
            list_jobs(&gateway, SortKey::Date, 3, 6).await.unwrap().items.len(),
        ];
        assert_eq!(sizes, [6, 6, 1]);
    }

    #[tokio::test]
    async fn test_missing_job_is_not_found() {
        let gateway = FakeGateway::new();
        assert!(matches!(get_job(&gateway, "nope").await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_requires_company_profile() {
        let form: JobPostForm = serde_json::from_value(json!({
            "title": "Backend Intern", "location": "Remote", "salary": "15000", "skillsrequired": "Rust"
        }))
        .unwrap();

        let empty = FakeGateway::new();
        assert!(matches!(
            create_job(&empty, &session(Role::Company), &form).await,
            Err(AppError::Validation(_))
        ));

        let gateway = FakeGateway::new().with_documents(
            "Company",
            vec![json!({ "_id": "co9", "sectionData": { "Company": { "userId": "u1" } } })],
        );
        let created = create_job(&gateway, &session(Role::Company), &form).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("new-1"));

        let (collection, data) = gateway.inserts.lock().unwrap()[0].clone();
        assert_eq!(collection, "jobpost");
        assert_eq!(data["sectionData"]["jobpost"]["companyId"], "co9");
        assert_eq!(data["sectionData"]["jobpost"]["salary"], 15000.0);
        assert!(data["sectionData"]["jobpost"]["createdAt"].is_string());
    }

    #[tokio::test]
    async fn test_students_cannot_post() {
        let form: JobPostForm = serde_json::from_value(json!({ "title": "x", "location": "y" })).unwrap();
        assert!(matches!(
            create_job(&FakeGateway::new(), &session(Role::Student), &form).await,
            Err(AppError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_upserts_by_user_and_job() {
        let gateway = FakeGateway::new().with_documents("jobpost", vec![job("j1", "Intern", json!(0))]);
        apply(&gateway, &session(Role::Student), "j1").await.unwrap();

        let command = gateway.last_update().unwrap();
        assert_eq!(command.collection_name, "application");
        assert!(command.options.upsert);
        assert_eq!(
            command.query,
            json!({ "sectionData.application.userId": "u1", "sectionData.application.jobId": "j1" })
        );
        assert_eq!(command.update["$set"]["sectionData.application.status"], "Applied");
        assert!(command.update["$set"]["sectionData.application.appliedAt"].is_string());
    }

    #[tokio::test]
    async fn test_my_applications_resolve_job_title() {
        let gateway = FakeGateway::new().with_documents(
            "application",
            vec![
                json!({
                    "_id": "a1",
                    "sectionData": { "application": { "userId": "u1", "jobId": "j1" } },
                    "job": [{ "sectionData": { "jobpost": { "title": "Data Intern" } } }]
                }),
                json!({ "_id": "a2", "sectionData": { "application": { "userId": "someone-else" } } }),
            ],
        );
        let apps = my_applications(&gateway, &session(Role::Student)).await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].job_title, "Data Intern");
    }
}
