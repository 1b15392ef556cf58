use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{render_view, GatewayData};
use crate::services::company_service::{self, CompanyForm};
use crate::services::lifecycle::load_view;
use crate::services::upload::UploadRequest;
use crate::session::{Session, SessionStore};
use crate::views::CompanyView;

const NO_COMPANY_YET: &str = "No company profile yet. Fill in your organization details to get started.";

#[utoipa::path(
    get,
    path = "/api/v1/company",
    tag = "Company",
    responses(
        (status = 200, description = "Company view (ready) or empty state", body = CompanyView),
        (status = 502, description = "Document API failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_company(gateway: GatewayData, session: web::ReqData<Session>) -> HttpResponse {
    log::info!("🏢 GET /company - user: {}", session.user_id);

    let state = load_view(
        company_service::get_company(gateway.get_ref(), &session),
        NO_COMPANY_YET,
    )
    .await;
    render_view(state)
}

#[utoipa::path(
    put,
    path = "/api/v1/company",
    tag = "Company",
    request_body = CompanyForm,
    responses(
        (status = 200, description = "Company profile saved"),
        (status = 400, description = "Validation error"),
        (status = 403, description = "Only company accounts have a company profile")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_company(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
    form: web::Json<CompanyForm>,
) -> HttpResponse {
    log::info!("✏️  PUT /company - user: {}", session.user_id);

    match company_service::update_company(gateway.get_ref(), &store, &session, &form).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => {
            log::warn!("❌ Company update failed for {}: {}", session.user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/company/logo",
    tag = "Company",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Logo stored, returns its path"),
        (status = 400, description = "Missing or invalid file")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_logo(
    gateway: GatewayData,
    session: web::ReqData<Session>,
    upload: web::Json<UploadRequest>,
) -> HttpResponse {
    log::info!("🖼️  POST /company/logo - user: {}", session.user_id);

    match company_service::upload_logo(gateway.get_ref(), &session, upload.into_inner()).await {
        Ok(path) => HttpResponse::Ok().json(json!({ "success": true, "filePath": path })),
        Err(e) => e.to_response(),
    }
}
