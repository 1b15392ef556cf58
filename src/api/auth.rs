use actix_web::{web, HttpResponse};

use super::GatewayData;
use crate::services::auth_service::{
    self, ForgotPasswordRequest, LoginRequest, LoginResponse, OtpSentResponse,
    ResetPasswordRequest, SignupRequest, VerifyOtpRequest,
};
use crate::session::{Session, SessionStore};

#[utoipa::path(
    post,
    path = "/api/v1/auth/signup/otp",
    tag = "Auth",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Verification code sent", body = OtpSentResponse),
        (status = 400, description = "Invalid signup form"),
        (status = 502, description = "Auth service unavailable")
    )
)]
pub async fn request_signup_otp(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    request: web::Json<SignupRequest>,
) -> HttpResponse {
    log::info!("📝 POST /auth/signup/otp - email: {}", request.email);

    match auth_service::request_signup_otp(gateway.get_ref(), &store, &request).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => {
            log::warn!("❌ Signup OTP failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/verify-otp",
    tag = "Auth",
    request_body = VerifyOtpRequest,
    responses(
        (status = 201, description = "Account created"),
        (status = 404, description = "No pending signup for this email")
    )
)]
pub async fn verify_otp(
    gateway: GatewayData,
    store: web::Data<SessionStore>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    log::info!("🔢 POST /auth/verify-otp - email: {}", request.email);

    match auth_service::verify_otp_and_signup(gateway.get_ref(), &store, &request).await {
        Ok(created) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "data": created,
        })),
        Err(e) => {
            log::warn!("❌ OTP verification failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 502, description = "Invalid credentials or auth service error")
    )
)]
pub async fn login(gateway: GatewayData, request: web::Json<LoginRequest>) -> HttpResponse {
    log::info!("🔐 POST /auth/login - email: {}", request.email);

    match auth_service::login(gateway.get_ref(), &request).await {
        Ok(response) => {
            log::info!("✅ Login successful: {}", request.email);
            HttpResponse::Ok().json(response)
        }
        Err(e) => {
            log::warn!("❌ Login failed: {} - {}", request.email, e);
            e.to_response()
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordRequest,
    responses((status = 200, description = "Reset code sent"))
)]
pub async fn forgot_password(
    gateway: GatewayData,
    request: web::Json<ForgotPasswordRequest>,
) -> HttpResponse {
    log::info!("📧 POST /auth/forgot-password - email: {}", request.email);

    match auth_service::forgot_password(gateway.get_ref(), &request).await {
        Ok(body) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": body })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/reset-password",
    tag = "Auth",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password changed"),
        (status = 400, description = "Passwords do not match or are too weak")
    )
)]
pub async fn reset_password(
    gateway: GatewayData,
    request: web::Json<ResetPasswordRequest>,
) -> HttpResponse {
    log::info!("🔑 POST /auth/reset-password - email: {}", request.email);

    match auth_service::reset_password(gateway.get_ref(), &request).await {
        Ok(body) => HttpResponse::Ok().json(serde_json::json!({ "success": true, "data": body })),
        Err(e) => e.to_response(),
    }
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    tag = "Auth",
    responses((status = 200, description = "Session state cleared")),
    security(("bearer_auth" = []))
)]
pub async fn logout(store: web::Data<SessionStore>, session: web::ReqData<Session>) -> HttpResponse {
    log::info!("👋 POST /auth/logout - user: {}", session.user_id);
    auth_service::logout(&store, &session);
    HttpResponse::Ok().json(serde_json::json!({ "success": true }))
}
