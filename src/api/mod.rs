pub mod auth;
pub mod company;
pub mod health;
pub mod jobs;
pub mod mentors;
pub mod mentorships;
pub mod metrics;
pub mod profile;
pub mod swagger;

use actix_web::error::InternalError;
use actix_web::{guard, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::gateway::DataGateway;
use crate::middleware::SessionMiddleware;
use crate::services::lifecycle::ViewState;
use crate::services::listing::{Page, SortKey};
use crate::utils::AppError;

/// Shared gateway handle (HTTP client in production, fake in tests)
pub type GatewayData = web::Data<dyn DataGateway>;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// date | salary-asc | salary-desc | title
    pub sort: Option<String>,
    /// 1-based page number
    pub page: Option<usize>,
}

impl ListQuery {
    pub fn sort_key(&self) -> Result<SortKey, AppError> {
        self.sort.as_deref().unwrap_or("date").parse()
    }

    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }
}

/// Empty collections render the empty state instead of an empty page.
pub fn non_empty<T>(page: Page<T>) -> Option<Page<T>> {
    (page.total_items > 0).then_some(page)
}

/// Renders a settled view: ready/empty → 200, failed → 502.
pub fn render_view<T: Serialize>(state: ViewState<T>) -> HttpResponse {
    match &state {
        ViewState::Ready(_) | ViewState::Empty(_) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "view": state,
        })),
        ViewState::Failed(message) => HttpResponse::BadGateway().json(serde_json::json!({
            "success": false,
            "error": message,
            "view": state,
        })),
        ViewState::Loading => HttpResponse::InternalServerError().json(serde_json::json!({
            "success": false,
            "error": "view did not settle",
        })),
    }
}

/// Extractor failures (bad JSON, non-numeric path segment, bad query) get the
/// same `{success:false,error}` body as handler errors.
fn extractor_error<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Display + std::fmt::Debug + 'static,
{
    log::warn!("⚠️  Rejected request: {}", err);
    let response = AppError::InvalidRequest(err.to_string()).to_response();
    InternalError::from_response(err, response).into()
}

/// Every route of the portal. `main` and the handler tests share it.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| extractor_error(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _req| extractor_error(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _req| extractor_error(err)));

    cfg.route("/health", web::get().to(health::health_check))
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Auth: public credential flows, logout needs a session
        .service(
            web::scope("/api/v1/auth")
                .route("/signup/otp", web::post().to(auth::request_signup_otp))
                .route("/verify-otp", web::post().to(auth::verify_otp))
                .route("/login", web::post().to(auth::login))
                .route("/forgot-password", web::post().to(auth::forgot_password))
                .route("/reset-password", web::post().to(auth::reset_password))
                .service(
                    web::resource("/logout")
                        .wrap(SessionMiddleware)
                        .route(web::post().to(auth::logout)),
                ),
        )
        // Profile (appuser) - requires JWT
        .service(
            web::scope("/api/v1/profile")
                .wrap(SessionMiddleware)
                .route("", web::get().to(profile::get_profile))
                .route("/completion", web::get().to(profile::get_completion))
                .route("/personal", web::put().to(profile::update_personal))
                .route("/availability", web::put().to(profile::update_availability))
                .route("/details/{section}", web::post().to(profile::add_detail))
                .route("/details/{section}/{index}", web::delete().to(profile::delete_detail))
                .route("/picture", web::post().to(profile::upload_picture)),
        )
        // Company profile - requires JWT
        .service(
            web::scope("/api/v1/company")
                .wrap(SessionMiddleware)
                .route("", web::get().to(company::get_company))
                .route("", web::put().to(company::update_company))
                .route("/logo", web::post().to(company::upload_logo)),
        )
        // Jobs: listing is public, writes need a session
        .service(
            web::scope("/api/v1/jobs")
                .service(
                    web::resource("")
                        .guard(guard::Post())
                        .wrap(SessionMiddleware)
                        .route(web::post().to(jobs::create_job)),
                )
                .route("", web::get().to(jobs::list_jobs))
                .service(
                    web::resource("/applications")
                        .wrap(SessionMiddleware)
                        .route(web::get().to(jobs::my_applications)),
                )
                .service(
                    web::resource("/{id}/apply")
                        .wrap(SessionMiddleware)
                        .route(web::post().to(jobs::apply)),
                )
                .route("/{id}", web::get().to(jobs::get_job)),
        )
        .service(
            web::scope("/api/v1/mentors")
                .route("", web::get().to(mentors::list_mentors))
                .route("/{slug}", web::get().to(mentors::get_mentor)),
        )
        .service(
            web::scope("/api/v1/mentorships")
                .service(
                    web::resource("")
                        .guard(guard::Post())
                        .wrap(SessionMiddleware)
                        .route(web::post().to(mentorships::create_mentorship)),
                )
                .route("", web::get().to(mentorships::list_mentorships)),
        );
}
