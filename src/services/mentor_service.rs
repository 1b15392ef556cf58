// Diretório de mentores: usuários appuser com role "mentor", endereçados por slug.

use serde_json::json;

use crate::gateway::{DataGateway, FetchQuery};
use crate::models::{normalize_all, AppUser, Record, SectionDocument};
use crate::services::listing::{sort_and_paginate, Page, SortKey};
use crate::services::patch::{field_filter, UserField};
use crate::utils::AppError;
use crate::views::{mentor_slug, MentorCard, MentorProfileView};

async fn fetch_mentors(gateway: &dyn DataGateway) -> Result<Vec<Record<AppUser>>, AppError> {
    // hash de senha nunca sai da API de documentos
    let query = FetchQuery::new(AppUser::COLLECTION)
        .filter(field_filter(vec![(UserField::Role, json!("mentor"))]))
        .projection(json!({ "password": 0, "sectionData.appuser.password": 0 }));
    Ok(normalize_all(gateway.fetch_section_data(&query).await?))
}

/// Alphabetical by display name
pub async fn list_mentors(
    gateway: &dyn DataGateway,
    page: usize,
    page_size: usize,
) -> Result<Page<MentorCard>, AppError> {
    let cards: Vec<MentorCard> = fetch_mentors(gateway).await?.iter().map(MentorCard::from).collect();
    Ok(sort_and_paginate(cards, SortKey::Title, page, page_size))
}

pub async fn get_mentor_by_slug(
    gateway: &dyn DataGateway,
    slug: &str,
) -> Result<MentorProfileView, AppError> {
    let slug = slug.trim().to_lowercase();
    fetch_mentors(gateway)
        .await?
        .iter()
        .find(|record| mentor_slug(record) == slug || record.id == slug)
        .map(MentorProfileView::from)
        .ok_or_else(|| AppError::NotFound(format!("mentor '{}'", slug)))
}
