use actix_web::{web, HttpResponse};
use serde_json::{json, Value};

use super::GatewayData;
use crate::services::profile_service::{
    self, AvailabilityForm, PersonalDetailsForm, ProfileResponse,
};
use crate::services::upload::UploadRequest;
use crate::session::{ProfileSection, Session, SessionStore};
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/api/v1/profile",
    tag = "Profile",
    responses(
        (status = 200, description = "Profile view and completion flags", body = ProfileResponse),
        (status = 404, description = "User document not found"),
        (status = 502, description = "Document API failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_profile(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
) -> HttpResponse {
    log::info!("👤 GET /profile - user: {}", session.user_id);

    match profile_service::get_profile(gateway.get_ref(), &store, &session).await {
        Ok(response) => HttpResponse::Ok().json(json!({ "success": true, "data": response })),
        Err(e) => {
            log::error!("❌ Failed to load profile {}: {}", session.user_id, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/v1/profile/completion",
    tag = "Profile",
    responses((status = 200, description = "Completion flags known to this session")),
    security(("bearer_auth" = []))
)]
pub async fn get_completion(
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "completion": profile_service::completion(&store, &session),
    }))
}

fn saved(section: ProfileSection) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": true, "section": section, "completed": true }))
}

#[utoipa::path(
    put,
    path = "/api/v1/profile/personal",
    tag = "Profile",
    request_body = PersonalDetailsForm,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "Validation error"),
        (status = 409, description = "A save for this section is already running")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_personal(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
    form: web::Json<PersonalDetailsForm>,
) -> HttpResponse {
    log::info!("✏️  PUT /profile/personal - user: {}", session.user_id);

    match profile_service::update_personal_details(gateway.get_ref(), &store, &session, &form).await {
        Ok(()) => saved(ProfileSection::Personal),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    put,
    path = "/api/v1/profile/availability",
    tag = "Profile",
    request_body = AvailabilityForm,
    responses(
        (status = 200, description = "Saved"),
        (status = 400, description = "No slot selected")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_availability(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
    form: web::Json<AvailabilityForm>,
) -> HttpResponse {
    log::info!("📅 PUT /profile/availability - user: {}", session.user_id);

    match profile_service::update_availability(gateway.get_ref(), &store, &session, form.into_inner()).await {
        Ok(()) => saved(ProfileSection::Availability),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/details/{section}",
    tag = "Profile",
    params(("section" = String, Path, description = "certificates | projects | achievements | responsibilities")),
    request_body = Object,
    responses(
        (status = 200, description = "Entry appended"),
        (status = 400, description = "Invalid entry or section")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_detail(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
    path: web::Path<String>,
    entry: web::Json<Value>,
) -> HttpResponse {
    let section = match path.parse::<ProfileSection>() {
        Ok(section) => section,
        Err(e) => return e.to_response(),
    };
    log::info!("➕ POST /profile/details/{:?} - user: {}", section, session.user_id);

    match profile_service::add_detail(gateway.get_ref(), &store, &session, section, entry.into_inner()).await {
        Ok(()) => saved(section),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/profile/details/{section}/{index}",
    tag = "Profile",
    params(
        ("section" = String, Path, description = "Detail list"),
        ("index" = usize, Path, description = "0-based position in the list")
    ),
    responses(
        (status = 200, description = "Entry removed"),
        (status = 404, description = "No entry at that index")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_detail(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    session: web::ReqData<Session>,
    path: web::Path<(String, usize)>,
) -> HttpResponse {
    let (section, index) = path.into_inner();
    let section = match section.parse::<ProfileSection>() {
        Ok(section) => section,
        Err(e) => return e.to_response(),
    };
    log::info!("🗑️  DELETE /profile/details/{:?}/{} - user: {}", section, index, session.user_id);

    match profile_service::delete_detail(gateway.get_ref(), &store, &session, section, index).await {
        Ok(()) => HttpResponse::Ok().json(json!({ "success": true })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/profile/picture",
    tag = "Profile",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Picture stored, returns its path"),
        (status = 400, description = "Missing or invalid file")
    ),
    security(("bearer_auth" = []))
)]
pub async fn upload_picture(
    gateway: GatewayData,
    session: web::ReqData<Session>,
    upload: web::Json<UploadRequest>,
) -> HttpResponse {
    log::info!("🖼️  POST /profile/picture - user: {}", session.user_id);

    match profile_service::upload_profile_picture(gateway.get_ref(), &session, upload.into_inner()).await {
        Ok(path) => HttpResponse::Ok().json(json!({ "success": true, "filePath": path })),
        Err(e @ AppError::Gateway(_)) => {
            log::error!("❌ Picture upload failed for {}: {}", session.user_id, e);
            e.to_response()
        }
        Err(e) => e.to_response(),
    }
}
