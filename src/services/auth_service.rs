// Fluxos de credenciais: signup com OTP, login, recuperação de senha.
// Tokens são emitidos pelo serviço remoto; aqui só lemos as claims.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::gateway::{AuthFlow, DataGateway};
use crate::services::validation;
use crate::session::{Role, Session, SessionStore};
use crate::utils::jwt::decode_unverified;
use crate::utils::{AppError, GatewayError};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub legalname: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    /// student, mentor, company or institute
    pub role: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub otp: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OtpSentResponse {
    pub success: bool,
    #[schema(value_type = String)]
    pub ticket: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user_id: Option<String>,
    pub role: Role,
    #[schema(value_type = Object)]
    pub user: Value,
}

/// 2xx bodies can still say `{"success": false, "message": ...}`
fn ensure_accepted(body: Value) -> Result<Value, AppError> {
    if body.get("success").and_then(Value::as_bool) == Some(false) {
        let message = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(Value::as_str)
            .unwrap_or("Request was rejected")
            .to_string();
        return Err(GatewayError::Rejected(message).into());
    }
    Ok(body)
}

/// Looks for a string field at the top level or under `data`.
fn find_str<'a>(body: &'a Value, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|key| {
        body.get(*key)
            .or_else(|| body.get("data").and_then(|d| d.get(*key)))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    })
}

pub async fn request_signup_otp(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    request: &SignupRequest,
) -> Result<OtpSentResponse, AppError> {
    validation::validate_signup(request)?;

    let body = json!({ "email": request.email.trim(), "legalname": request.legalname.trim() });
    ensure_accepted(gateway.auth_request(AuthFlow::SignupOtp, &body).await?)?;

    let pending = serde_json::to_value(request)
        .map_err(|e| AppError::InvalidRequest(format!("cannot store signup: {}", e)))?;
    let ticket = store.stash_pending(&request.email, pending);

    log::info!("📧 Signup OTP sent to {}", request.email.trim());
    Ok(OtpSentResponse {
        success: true,
        ticket,
        message: "Verification code sent to your email".to_string(),
    })
}

/// Verifies the code, then creates the account from the stashed signup.
pub async fn verify_otp_and_signup(
    gateway: &dyn DataGateway,
    store: &SessionStore,
    request: &VerifyOtpRequest,
) -> Result<Value, AppError> {
    validation::validate_email(&request.email)?;
    validation::validate_otp(&request.otp)?;

    if !store.has_pending(&request.email) {
        return Err(AppError::NotFound(
            "No pending signup for this email, please request a new code".to_string(),
        ));
    }

    let body = json!({ "email": request.email.trim(), "otp": request.otp.trim() });
    ensure_accepted(gateway.auth_request(AuthFlow::VerifyOtp, &body).await?)?;

    let mut pending = store.take_pending(&request.email).ok_or_else(|| {
        AppError::NotFound("Signup request expired, please start again".to_string())
    })?;
    if let Some(map) = pending.as_object_mut() {
        let role = map.get("role").and_then(Value::as_str).unwrap_or_default().to_string();
        map.insert("roleId".to_string(), json!(Role::from_role_id(&role).as_str()));
    }

    match gateway
        .auth_request(AuthFlow::Signup, &pending)
        .await
        .map_err(AppError::from)
        .and_then(ensure_accepted)
    {
        Ok(created) => {
            log::info!("✅ Account created for {}", request.email.trim());
            Ok(created)
        }
        Err(e) => {
            log::warn!("❌ Signup failed for {}: {}", request.email.trim(), e);
            store.restore_pending(&request.email, pending);
            Err(e)
        }
    }
}

pub async fn login(gateway: &dyn DataGateway, request: &LoginRequest) -> Result<LoginResponse, AppError> {
    validation::validate_email(&request.email)?;
    if request.password.is_empty() {
        return Err(AppError::Validation("Password is required".to_string()));
    }

    let body = json!({ "email": request.email.trim(), "password": request.password });
    let response = ensure_accepted(gateway.auth_request(AuthFlow::Login, &body).await?)?;

    let access_token = find_str(&response, &["accessToken", "token", "access_token"])
        .ok_or_else(|| {
            AppError::Gateway(GatewayError::Decode("login response has no access token".into()))
        })?
        .to_string();
    let refresh_token = find_str(&response, &["refreshToken", "refresh_token"]).map(String::from);

    let claims = decode_unverified(&access_token).map_err(AppError::Unauthorized)?;
    let role = claims
        .role_id
        .as_deref()
        .map(Role::from_role_id)
        .unwrap_or(Role::Unknown);

    let user = response
        .get("user")
        .or_else(|| response.get("data").and_then(|d| d.get("user")))
        .cloned()
        .unwrap_or(Value::Null);

    log::info!("🔐 Login ok: {} ({})", request.email.trim(), role);
    Ok(LoginResponse {
        success: true,
        access_token,
        refresh_token,
        user_id: claims.subject().map(String::from),
        role,
        user,
    })
}

pub async fn forgot_password(
    gateway: &dyn DataGateway,
    request: &ForgotPasswordRequest,
) -> Result<Value, AppError> {
    validation::validate_email(&request.email)?;
    let body = json!({ "email": request.email.trim() });
    ensure_accepted(gateway.auth_request(AuthFlow::ForgotPassword, &body).await?)
}

pub async fn reset_password(
    gateway: &dyn DataGateway,
    request: &ResetPasswordRequest,
) -> Result<Value, AppError> {
    validation::validate_reset_password(request)?;
    let body = json!({
        "email": request.email.trim(),
        "otp": request.otp.trim(),
        "password": request.password,
    });
    ensure_accepted(gateway.auth_request(AuthFlow::ResetPassword, &body).await?)
}

pub fn logout(store: &SessionStore, session: &Session) {
    store.logout(&session.user_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::FakeGateway;
    use crate::utils::jwt::tests::mint_token;

    fn signup() -> SignupRequest {
        SignupRequest {
            legalname: "Ana Lima".into(),
            email: "ana@example.com".into(),
            mobile: "9876543210".into(),
            password: "abc12345".into(),
            role: "intern".into(),
        }
    }

    #[tokio::test]
    async fn test_otp_then_signup_uses_pending_user() {
        let gateway = FakeGateway::new();
        let store = SessionStore::new();

        request_signup_otp(&gateway, &store, &signup()).await.unwrap();
        assert!(store.has_pending("ana@example.com"));

        let verify = VerifyOtpRequest { email: "ana@example.com".into(), otp: "123456".into() };
        verify_otp_and_signup(&gateway, &store, &verify).await.unwrap();

        let calls = gateway.auth_calls.lock().unwrap().clone();
        let flows: Vec<AuthFlow> = calls.iter().map(|(f, _)| *f).collect();
        assert_eq!(flows, vec![AuthFlow::SignupOtp, AuthFlow::VerifyOtp, AuthFlow::Signup]);
        assert_eq!(calls[2].1["legalname"], "Ana Lima");
        assert_eq!(calls[2].1["roleId"], "student");
        assert!(!store.has_pending("ana@example.com"));
    }

    #[tokio::test]
    async fn test_invalid_signup_never_calls_gateway() {
        let gateway = FakeGateway::new();
        let store = SessionStore::new();
        let mut request = signup();
        request.email = "not-an-email".into();

        assert!(matches!(
            request_signup_otp(&gateway, &store, &request).await,
            Err(AppError::Validation(_))
        ));
        assert!(gateway.auth_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_signup_keeps_pending_user() {
        let gateway = FakeGateway::new().with_auth_response(
            AuthFlow::Signup,
            Ok(json!({ "success": false, "message": "Email already registered" })),
        );
        let store = SessionStore::new();
        request_signup_otp(&gateway, &store, &signup()).await.unwrap();

        let verify = VerifyOtpRequest { email: "ana@example.com".into(), otp: "123456".into() };
        let err = verify_otp_and_signup(&gateway, &store, &verify).await.unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");
        assert!(store.has_pending("ana@example.com"));
    }

    #[tokio::test]
    async fn test_verify_without_pending_signup() {
        let gateway = FakeGateway::new();
        let store = SessionStore::new();
        let verify = VerifyOtpRequest { email: "ana@example.com".into(), otp: "123456".into() };
        assert!(matches!(
            verify_otp_and_signup(&gateway, &store, &verify).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_login_decodes_role() {
        let token = mint_token("u42", "employer", 4_000_000_000);
        let gateway = FakeGateway::new().with_auth_response(
            AuthFlow::Login,
            Ok(json!({ "data": { "accessToken": token, "refreshToken": "r1", "user": { "email": "c@x.io" } } })),
        );
        let request = LoginRequest { email: "c@x.io".into(), password: "secret".into() };
        let response = login(&gateway, &request).await.unwrap();

        assert_eq!(response.role, Role::Company);
        assert_eq!(response.user_id.as_deref(), Some("u42"));
        assert_eq!(response.refresh_token.as_deref(), Some("r1"));
        assert_eq!(response.user["email"], "c@x.io");
    }

    #[tokio::test]
    async fn test_login_without_token_is_gateway_error() {
        let gateway = FakeGateway::new();
        let request = LoginRequest { email: "c@x.io".into(), password: "secret".into() };
        assert!(matches!(
            login(&gateway, &request).await,
            Err(AppError::Gateway(GatewayError::Decode(_)))
        ));
    }

    #[tokio::test]
    async fn test_reset_password_mismatch() {
        let gateway = FakeGateway::new();
        let request = ResetPasswordRequest {
            email: "a@b.co".into(),
            otp: "1234".into(),
            password: "abc12345".into(),
            confirm_password: "abc12346".into(),
        };
        assert!(reset_password(&gateway, &request).await.is_err());
        assert!(gateway.auth_calls.lock().unwrap().is_empty());
    }
}
