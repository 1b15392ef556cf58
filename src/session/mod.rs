pub mod store;

pub use store::SessionStore;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::jwt::decode_unverified;
use crate::utils::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Mentor,
    Company,
    Institute,
    Admin,
    Unknown,
}

impl Role {
    /// Maps the `roleId` claim. Older tokens use aliases ("intern", "employer", "college").
    pub fn from_role_id(role_id: &str) -> Self {
        match role_id.trim().to_lowercase().as_str() {
            "student" | "intern" => Role::Student,
            "mentor" => Role::Mentor,
            "company" | "employer" => Role::Company,
            "institute" | "college" => Role::Institute,
            "admin" => Role::Admin,
            _ => Role::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Mentor => "mentor",
            Role::Company => "company",
            Role::Institute => "institute",
            Role::Admin => "admin",
            Role::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of the caller, built once per request by `SessionMiddleware`.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: String,
    pub role: Role,
    pub email: Option<String>,
    pub access_token: String,
}

impl Session {
    pub fn from_bearer(token: &str, now: i64) -> Result<Self, AppError> {
        let claims = decode_unverified(token).map_err(AppError::Unauthorized)?;

        if claims.is_expired(now) {
            return Err(AppError::Unauthorized("Session expired, please log in again".to_string()));
        }

        let user_id = claims
            .subject()
            .ok_or_else(|| AppError::Unauthorized("Token has no user id".to_string()))?
            .to_string();

        Ok(Session {
            user_id,
            role: claims
                .role_id
                .as_deref()
                .map(Role::from_role_id)
                .unwrap_or(Role::Unknown),
            email: claims.email,
            access_token: token.to_string(),
        })
    }

    /// Admins pass every role check.
    pub fn require_role(&self, allowed: &[Role]) -> Result<(), AppError> {
        if self.role == Role::Admin || allowed.contains(&self.role) {
            Ok(())
        } else {
            Err(AppError::Forbidden(format!(
                "role '{}' cannot perform this action",
                self.role
            )))
        }
    }
}

/// Profile sections that carry a completion flag
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum ProfileSection {
    Personal,
    Availability,
    Certificates,
    Projects,
    Achievements,
    Responsibilities,
    Company,
}

impl FromStr for ProfileSection {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "personal" => Ok(ProfileSection::Personal),
            "availability" => Ok(ProfileSection::Availability),
            "certificates" => Ok(ProfileSection::Certificates),
            "projects" => Ok(ProfileSection::Projects),
            "achievements" => Ok(ProfileSection::Achievements),
            "responsibilities" => Ok(ProfileSection::Responsibilities),
            "company" => Ok(ProfileSection::Company),
            other => Err(AppError::InvalidRequest(format!("unknown profile section '{}'", other))),
        }
    }
}
