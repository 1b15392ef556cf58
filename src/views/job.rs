use chrono::{DateTime, Utc};
use serde::Serialize;

use super::*;
use crate::models::{parse_timestamp, Application, Company, JobPost, Record};

/// Name of the `$lookup` field that carries the job's company
pub const COMPANY_JOIN: &str = "company";
/// Name of the `$lookup` field that carries an application's job
pub const JOB_JOIN: &str = "job";

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobCard {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub company_logo: String,
    pub location: String,
    /// Numeric salary used for sorting; a missing salary counts as 0
    pub salary: f64,
    pub salary_label: String,
    pub skills: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<DateTime<Utc>>,
}

impl From<&Record<JobPost>> for JobCard {
    fn from(record: &Record<JobPost>) -> Self {
        let job = &record.body;
        let company = record.joined::<Company>(COMPANY_JOIN);
        let company_name = company
            .as_ref()
            .and_then(|c| c.body.organization_name.clone())
            .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
        let company_logo = company
            .as_ref()
            .and_then(|c| c.body.logo.clone())
            .unwrap_or_else(|| PLACEHOLDER_COMPANY_LOGO.to_string());

        let posted_at = record.created_at.or_else(|| {
            job.created_at
                .as_ref()
                .and_then(|s| parse_timestamp(&serde_json::Value::String(s.clone())))
        });

        JobCard {
            id: record.id.clone(),
            title: or_fallback(&job.title, UNTITLED_INTERNSHIP),
            company_name,
            company_logo,
            location: or_fallback(&job.location, NOT_SPECIFIED),
            salary: job.salary.unwrap_or(0.0),
            salary_label: salary_label(job.salary),
            skills: job.skillsrequired.clone(),
            posted_at,
        }
    }
}

pub fn salary_label(salary: Option<f64>) -> String {
    match salary {
        None => NOT_SPECIFIED.to_string(),
        Some(s) if s <= 0.0 => "Unpaid".to_string(),
        Some(s) if s.fract() == 0.0 => format!("{:.0} / month", s),
        Some(s) => format!("{:.2} / month", s),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobDetailView {
    #[serde(flatten)]
    pub card: JobCard,
    pub description: String,
    pub duration: String,
    pub job_type: String,
}

impl From<&Record<JobPost>> for JobDetailView {
    fn from(record: &Record<JobPost>) -> Self {
        JobDetailView {
            card: JobCard::from(record),
            description: or_fallback(&record.body.description, NOT_SPECIFIED),
            duration: or_fallback(&record.body.duration, NOT_SPECIFIED),
            job_type: or_fallback(&record.body.jobtype, NOT_SPECIFIED),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: String,
    pub job_id: String,
    pub job_title: String,
    pub applied_at: String,
    pub status: String,
}

impl From<&Record<Application>> for ApplicationView {
    fn from(record: &Record<Application>) -> Self {
        let job_title = record
            .joined::<JobPost>(JOB_JOIN)
            .and_then(|job| job.body.title)
            .unwrap_or_else(|| UNTITLED_INTERNSHIP.to_string());
        ApplicationView {
            id: record.id.clone(),
            job_id: or_fallback(&record.body.job_id, NOT_SPECIFIED),
            job_title,
            applied_at: or_fallback(&record.body.applied_at, NOT_SPECIFIED),
            status: or_fallback(&record.body.status, "Applied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_card_fallbacks() {
        let record: Record<JobPost> = Record::from_raw(json!({ "_id": "j1" }));
        let card = JobCard::from(&record);
        assert_eq!(card.title, UNTITLED_INTERNSHIP);
        assert_eq!(card.company_name, UNKNOWN_COMPANY);
        assert_eq!(card.location, NOT_SPECIFIED);
        assert_eq!(card.salary, 0.0);
        assert_eq!(card.salary_label, NOT_SPECIFIED);
        assert!(card.posted_at.is_none());

        let rendered = serde_json::to_value(&card).unwrap();
        assert!(rendered.get("postedAt").is_none());
        assert!(rendered.as_object().unwrap().values().all(|v| !v.is_null()));
    }

    #[test]
    fn test_job_card_with_company_and_string_skills() {
        let record: Record<JobPost> = Record::from_raw(json!({
            "_id": "j2",
            "sectionData": { "jobpost": {
                "title": "Backend Intern",
                "salary": "15,000",
                "skillsrequired": "Rust, SQL",
                "createdAt": "2024-06-01T00:00:00Z"
            }},
            "company": [{ "sectionData": { "Company": { "organizationName": "Acme", "logo": "logo/acme.png" } } }]
        }));
        let card = JobCard::from(&record);
        assert_eq!(card.company_name, "Acme");
        assert_eq!(card.company_logo, "logo/acme.png");
        assert_eq!(card.salary, 15000.0);
        assert_eq!(card.salary_label, "15000 / month");
        assert_eq!(card.skills, vec!["Rust", "SQL"]);
        assert!(card.posted_at.is_some());
    }

    #[test]
    fn test_salary_labels() {
        assert_eq!(salary_label(Some(0.0)), "Unpaid");
        assert_eq!(salary_label(Some(1234.5)), "1234.50 / month");
    }

    #[test]
    fn test_application_view() {
        let record: Record<Application> = Record::from_raw(json!({
            "_id": "a1",
            "sectionData": { "application": { "jobId": "j1", "appliedAt": "2024-06-02T00:00:00Z" } },
            "job": [{ "sectionData": { "jobpost": { "title": "Data Intern" } } }]
        }));
        let view = ApplicationView::from(&record);
        assert_eq!(view.job_title, "Data Intern");
        assert_eq!(view.status, "Applied");
    }
}
