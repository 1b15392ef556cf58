use actix_web::{web, HttpResponse};
use chrono::Utc;

use super::{non_empty, render_view, GatewayData, ListQuery};
use crate::config::PortalConfig;
use crate::services::lifecycle::load_view;
use crate::services::mentorship_service::{self, MentorshipForm};
use crate::services::CreatedResponse;
use crate::session::Session;
use crate::views::MentorshipCard;

const NO_MENTORSHIPS_YET: &str = "No mentorship programs yet.";

#[utoipa::path(
    get,
    path = "/api/v1/mentorships",
    tag = "Mentorships",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of mentorship programs, or the empty state", body = [MentorshipCard]),
        (status = 400, description = "Unknown sort key")
    )
)]
pub async fn list_mentorships(
    gateway: GatewayData,
    config: web::Data<PortalConfig>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    let sort = match query.sort_key() {
        Ok(sort) => sort,
        Err(e) => return e.to_response(),
    };
    log::info!("🎓 GET /mentorships - sort: {:?}, page: {}", sort, query.page());

    let state = load_view(
        async {
            mentorship_service::list_mentorships(gateway.get_ref(), sort, query.page(), config.listing_page_size)
                .await
                .map(non_empty)
        },
        NO_MENTORSHIPS_YET,
    )
    .await;
    render_view(state)
}

#[utoipa::path(
    post,
    path = "/api/v1/mentorships",
    tag = "Mentorships",
    request_body = MentorshipForm,
    responses(
        (status = 201, description = "Program created", body = CreatedResponse),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only mentors can create programs")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_mentorship(
    gateway: GatewayData,
    session: web::ReqData<Session>,
    form: web::Json<MentorshipForm>,
) -> HttpResponse {
    log::info!("📝 POST /mentorships - user: {}", session.user_id);

    let today = Utc::now().date_naive();
    match mentorship_service::create_mentorship(gateway.get_ref(), &session, &form, today).await {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => {
            log::warn!("❌ Mentorship rejected for {}: {}", session.user_id, e);
            e.to_response()
        }
    }
}
