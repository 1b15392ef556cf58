// Programas de mentoria: listagem com o nome do mentor via $lookup e criação por mentores.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::gateway::{DataGateway, FetchQuery, Lookup};
use crate::models::{normalize_all, AppUser, Mentorship, SectionDocument};
use crate::services::listing::{sort_and_paginate, Page, SortKey};
use crate::services::patch::{section_document, EntityField, MentorshipField};
use crate::services::{validation, CreatedResponse};
use crate::session::{Role, Session};
use crate::utils::AppError;
use crate::views::{MentorshipCard, MENTOR_JOIN};

#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct MentorshipForm {
    pub title: String,
    pub focus_area: String,
    /// YYYY-MM-DD
    pub deadline: String,
    pub duration: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewMentorship<'a> {
    title: &'a str,
    focus_area: &'a str,
    deadline: &'a str,
    duration: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<&'a str>,
    #[serde(rename = "mentorId")]
    mentor_id: &'a str,
    #[serde(rename = "createdAt")]
    created_at: String,
}

pub async fn list_mentorships(
    gateway: &dyn DataGateway,
    sort: SortKey,
    page: usize,
    page_size: usize,
) -> Result<Page<MentorshipCard>, AppError> {
    let query = FetchQuery::new(Mentorship::COLLECTION).lookup(Lookup::new(
        AppUser::COLLECTION,
        &MentorshipField::MentorId.path(),
        "_id",
        MENTOR_JOIN,
    ));
    let docs = gateway.fetch_section_data(&query).await?;

    let cards: Vec<MentorshipCard> = normalize_all::<Mentorship>(docs)
        .iter()
        .map(MentorshipCard::from)
        .collect();
    Ok(sort_and_paginate(cards, sort, page, page_size))
}

pub async fn create_mentorship(
    gateway: &dyn DataGateway,
    session: &Session,
    form: &MentorshipForm,
    today: NaiveDate,
) -> Result<CreatedResponse, AppError> {
    session.require_role(&[Role::Mentor])?;
    validation::validate_mentorship(form, today)?;

    let data = section_document::<MentorshipField, _>(NewMentorship {
        title: form.title.trim(),
        focus_area: form.focus_area.trim(),
        deadline: form.deadline.trim(),
        duration: form.duration.trim(),
        description: form.description.as_deref(),
        mentor_id: &session.user_id,
        created_at: Utc::now().to_rfc3339(),
    })?;

    let response = gateway
        .add_general_data(Mentorship::COLLECTION, &data, &session.access_token)
        .await?;

    log::info!("🎓 Mentorship '{}' created by {}", form.title.trim(), session.user_id);
    Ok(CreatedResponse {
        success: true,
        id: response.inserted_id_string(),
    })
}
