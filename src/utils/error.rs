use actix_web::{http::StatusCode, HttpResponse};
use std::fmt;

use crate::services::lifecycle::{TimedError, ERROR_DISPLAY_SECS};

/// Falhas de comunicação com a API remota de documentos
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayError {
    Transport(String),
    Status { status: u16, message: String },
    Decode(String),
    MissingToken,
    MissingFile,
    Rejected(String),
}

impl fmt::Display for GatewayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GatewayError::Transport(msg) => write!(f, "Gateway unreachable: {}", msg),
            GatewayError::Status { status, message } => {
                write!(f, "Gateway returned {}: {}", status, message)
            }
            GatewayError::Decode(msg) => write!(f, "Unexpected gateway response: {}", msg),
            GatewayError::MissingToken => write!(f, "Authentication token not found"),
            GatewayError::MissingFile => write!(f, "No file selected for upload"),
            GatewayError::Rejected(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for GatewayError {}

#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    Gateway(GatewayError),
    Validation(String),
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    InvalidRequest(String),
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Gateway(e) => write!(f, "{}", e),
            AppError::Validation(msg) => write!(f, "{}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "{}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        AppError::Gateway(e)
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Gateway(GatewayError::MissingToken) => StatusCode::UNAUTHORIZED,
            AppError::Gateway(GatewayError::MissingFile) => StatusCode::BAD_REQUEST,
            AppError::Gateway(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Corpo padrão `{"success": false, "error": ...}` usado por todos os handlers
    pub fn to_response(&self) -> HttpResponse {
        let body = match self {
            AppError::Validation(msg) => serde_json::json!({
                "success": false,
                "error": msg,
                "clearAfterMs": ERROR_DISPLAY_SECS * 1000,
                "clearsAt": TimedError::new(msg.as_str(), chrono::Utc::now()).clears_at(),
            }),
            other => serde_json::json!({
                "success": false,
                "error": other.to_string(),
            }),
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}
