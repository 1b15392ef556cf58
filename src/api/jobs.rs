use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{non_empty, render_view, GatewayData, ListQuery};
use crate::config::PortalConfig;
use crate::services::job_service::{self, JobPostForm};
use crate::services::lifecycle::load_view;
use crate::services::CreatedResponse;
use crate::session::Session;
use crate::views::{ApplicationView, JobCard, JobDetailView};

const NO_JOBS_YET: &str = "No internships posted yet. Check back soon!";

#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    tag = "Jobs",
    params(ListQuery),
    responses(
        (status = 200, description = "Page of internship cards, or the empty state", body = [JobCard]),
        (status = 400, description = "Unknown sort key"),
        (status = 502, description = "Document API failure")
    )
)]
pub async fn list_jobs(
    gateway: GatewayData,
    config: web::Data<PortalConfig>,
    query: web::Query<ListQuery>,
) -> HttpResponse {
    let sort = match query.sort_key() {
        Ok(sort) => sort,
        Err(e) => return e.to_response(),
    };
    log::info!("📋 GET /jobs - sort: {:?}, page: {}", sort, query.page());

    let state = load_view(
        async {
            job_service::list_jobs(gateway.get_ref(), sort, query.page(), config.listing_page_size)
                .await
                .map(non_empty)
        },
        NO_JOBS_YET,
    )
    .await;
    render_view(state)
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/{id}",
    tag = "Jobs",
    params(("id" = String, Path, description = "Job post id")),
    responses(
        (status = 200, description = "Internship detail", body = JobDetailView),
        (status = 404, description = "Job post not found")
    )
)]
pub async fn get_job(gateway: GatewayData, path: web::Path<String>) -> HttpResponse {
    let job_id = path.into_inner();
    log::info!("🔍 GET /jobs/{}", job_id);

    match job_service::get_job(gateway.get_ref(), &job_id).await {
        Ok(view) => HttpResponse::Ok().json(json!({ "success": true, "data": view })),
        Err(e) => {
            log::warn!("❌ Job {} unavailable: {}", job_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    tag = "Jobs",
    request_body = JobPostForm,
    responses(
        (status = 201, description = "Internship posted", body = CreatedResponse),
        (status = 400, description = "Validation error or missing company profile"),
        (status = 403, description = "Only company accounts can post")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_job(
    gateway: GatewayData,
    session: web::ReqData<Session>,
    form: web::Json<JobPostForm>,
) -> HttpResponse {
    log::info!("📝 POST /jobs - user: {}", session.user_id);

    match job_service::create_job(gateway.get_ref(), &session, &form).await {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => {
            log::warn!("❌ Job post rejected for {}: {}", session.user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/jobs/{id}/apply",
    tag = "Jobs",
    params(("id" = String, Path, description = "Job post id")),
    responses(
        (status = 200, description = "Application recorded"),
        (status = 403, description = "Only students can apply"),
        (status = 404, description = "Job post not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn apply(
    gateway: GatewayData,
    session: web::ReqData<Session>,
    path: web::Path<String>,
) -> HttpResponse {
    let job_id = path.into_inner();
    log::info!("📨 POST /jobs/{}/apply - user: {}", job_id, session.user_id);

    match job_service::apply(gateway.get_ref(), &session, &job_id).await {
        Ok(()) => HttpResponse::Ok().json(json!({
            "success": true,
            "status": job_service::DEFAULT_APPLICATION_STATUS,
        })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/jobs/applications",
    tag = "Jobs",
    responses(
        (status = 200, description = "Caller's applications, newest first", body = [ApplicationView])
    ),
    security(("bearer_auth" = []))
)]
pub async fn my_applications(gateway: GatewayData, session: web::ReqData<Session>) -> HttpResponse {
    match job_service::my_applications(gateway.get_ref(), &session).await {
        Ok(applications) => HttpResponse::Ok().json(json!({
            "success": true,
            "count": applications.len(),
            "data": applications,
        })),
        Err(e) => e.to_response(),
    }
}
