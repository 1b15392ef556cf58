use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::utils::AppError;

/// Configuração do portal, lida uma única vez na inicialização
#[derive(Debug, Clone)]
pub struct PortalConfig {
    pub host: String,
    pub port: u16,
    pub gateway: GatewayConfig,
    pub listing_page_size: usize,
    pub cors_allowed_origins: Vec<String>,
}

/// Connection settings for the remote document API
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub db_name: String,
    pub app_name: String,
    pub timeout_secs: u64,
}

impl PortalConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads values from `lookup` (used by tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = required(&lookup, "GATEWAY_BASE_URL")?;
        let api_key = required(&lookup, "GATEWAY_API_KEY")?;

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let listing_page_size: usize = parse_or(&lookup, "LISTING_PAGE_SIZE", 6);

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(&lookup, "PORT", 3002),
            gateway: GatewayConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                api_key,
                db_name: lookup("GATEWAY_DB_NAME")
                    .unwrap_or_else(|| "internship_portal".to_string()),
                app_name: lookup("GATEWAY_APP_NAME")
                    .unwrap_or_else(|| "internship_portal".to_string()),
                timeout_secs: parse_or(&lookup, "GATEWAY_TIMEOUT_SECS", 15),
            },
            listing_page_size: listing_page_size.max(1),
            cors_allowed_origins,
        })
    }
}

fn required<F>(lookup: &F, key: &str) -> Result<String, AppError>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            log::warn!("⚠️  Invalid {} value '{}': {} (using {})", key, raw, e, default);
            default
        }),
        None => default,
    }
}
