use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{non_empty, render_view, GatewayData, ListQuery};
use crate::config::PortalConfig;
use crate::services::lifecycle::load_view;
use crate::services::mentor_service;
use crate::views::{MentorCard, MentorProfileView};

const NO_MENTORS_YET: &str = "No mentors available right now.";

#[utoipa::path(
    get,
    path = "/api/v1/mentors",
    tag = "Mentors",
    params(ListQuery),
    responses(
        (status = 200, description = "Mentor cards in alphabetical order", body = [MentorCard]),
        (status = 502, description = "Document API failure")
    )
)]
pub async fn list_mentors(
    gateway: GatewayData,
    config: web::Data<PortalConfig>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    log::info!("🧑‍🏫 GET /mentors - page: {}", query.page());

    let state = load_view(
        async {
            mentor_service::list_mentors(gateway.get_ref(), query.page(), config.listing_page_size)
                .await
                .map(non_empty)
        },
        NO_MENTORS_YET,
    )
    .await;
    render_view(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/mentors/{slug}",
    tag = "Mentors",
    params(("slug" = String, Path, description = "Slug of the mentor's name, or the mentor id")),
    responses(
        (status = 200, description = "Public mentor profile", body = MentorProfileView),
        (status = 404, description = "No mentor with that slug")
    )
)]
pub async fn get_mentor(gateway: GatewayData, path: web::Path<String>) -> HttpResponse {
    let slug = path.into_inner();
    log::info!("🔍 GET /mentors/{}", slug);

    match mentor_service::get_mentor_by_slug(gateway.get_ref(), &slug).await {
        Ok(view) => HttpResponse::Ok().json(json!({ "success": true, "data": view })),
        Err(e) => e.to_response(),
    }
}
