use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Internship Portal API",
        version = "1.0.0",
        description = "Backend-for-frontend of the internship and mentorship marketplace. \n\nEvery read and write is forwarded to the remote document API; this service normalizes documents into views, validates forms and keeps per-session completion state.\n\n**Authentication:** write endpoints require the JWT Bearer token issued by the remote auth service."
    ),
    paths(
        // Auth
        crate::api::auth::request_signup_otp,
        crate::api::auth::verify_otp,
        crate::api::auth::login,
        crate::api::auth::forgot_password,
        crate::api::auth::reset_password,
        crate::api::auth::logout,

        // Profile
        crate::api::profile::get_profile,
        crate::api::profile::get_completion,
        crate::api::profile::update_personal,
        crate::api::profile::update_availability,
        crate::api::profile::add_detail,
        crate::api::profile::delete_detail,
        crate::api::profile::upload_picture,

        // Company
        crate::api::company::get_company,
        crate::api::company::update_company,
        crate::api::company::upload_logo,

        // Jobs
        crate::api::jobs::list_jobs,
        crate::api::jobs::get_job,
        crate::api::jobs::create_job,
        crate::api::jobs::apply,
        crate::api::jobs::my_applications,

        // Mentors & mentorships
        crate::api::mentors::list_mentors,
        crate::api::mentors::get_mentor,
        crate::api::mentorships::list_mentorships,
        crate::api::mentorships::create_mentorship,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            // Auth
            crate::services::auth_service::SignupRequest,
            crate::services::auth_service::VerifyOtpRequest,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::ForgotPasswordRequest,
            crate::services::auth_service::ResetPasswordRequest,
            crate::services::auth_service::OtpSentResponse,
            crate::services::auth_service::LoginResponse,
            crate::session::Role,
            crate::session::ProfileSection,

            // Forms
            crate::services::profile_service::PersonalDetailsForm,
            crate::services::profile_service::AvailabilityForm,
            crate::services::profile_service::ProfileResponse,
            crate::services::company_service::CompanyForm,
            crate::services::job_service::JobPostForm,
            crate::services::mentorship_service::MentorshipForm,
            crate::services::upload::UploadRequest,
            crate::services::CreatedResponse,

            // Views
            crate::views::UserProfileView,
            crate::views::CompanyView,
            crate::views::JobCard,
            crate::views::JobDetailView,
            crate::views::ApplicationView,
            crate::views::MentorCard,
            crate::views::MentorProfileView,
            crate::views::MentorshipCard,

            // Health & Metrics
            crate::api::health::HealthResponse,
            crate::utils::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Signup with e-mail OTP, login and password reset, proxied to the remote auth service."),
        (name = "Profile", description = "The caller's user document: personal details, availability, detail lists and picture."),
        (name = "Company", description = "Company profile of company accounts."),
        (name = "Jobs", description = "Internship listings, posting and applications."),
        (name = "Mentors", description = "Public mentor directory addressed by slug."),
        (name = "Mentorships", description = "Mentorship programs created by mentors."),
        (name = "Health", description = "Health check and process counters."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token returned by /api/v1/auth/login"))
                        .build()
                ),
            );
        }
    }
}
