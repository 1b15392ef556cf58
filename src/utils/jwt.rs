use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims emitidas pelo serviço de autenticação remoto.
///
/// Campos variam entre versões do backend, por isso todos são opcionais.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct PortalClaims {
    #[serde(rename = "roleId", default)]
    pub role_id: Option<String>,
    #[serde(rename = "userId", alias = "user_id", alias = "_id", default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl PortalClaims {
    pub fn subject(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .or(self.sub.as_deref())
            .filter(|s| !s.is_empty())
    }

    pub fn is_expired(&self, now: i64) -> bool {
        matches!(self.exp, Some(exp) if exp <= now)
    }
}

/// Decodes the payload of a token issued by the remote auth service.
///
/// The signature is NOT checked: the portal has no access to the signing key
/// and only reads `roleId` / identity claims. Every mutating call is still
/// authorised by the remote API with the same bearer token.
pub fn decode_unverified(token: &str) -> Result<PortalClaims, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<PortalClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    pub fn mint_token(user_id: &str, role_id: &str, exp: i64) -> String {
        let claims = serde_json::json!({
            "userId": user_id,
            "roleId": role_id,
            "email": format!("{}@example.com", user_id),
            "exp": exp,
        });
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"remote-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_reads_role_without_key() {
        let token = mint_token("u1", "mentor", 4_102_444_800);
        let claims = decode_unverified(&token).unwrap();
        assert_eq!(claims.role_id.as_deref(), Some("mentor"));
        assert_eq!(claims.subject(), Some("u1"));
        assert!(!claims.is_expired(1_700_000_000));
    }

    #[test]
    fn test_expired_token_is_reported() {
        let token = mint_token("u1", "student", 1_000);
        let claims = decode_unverified(&token).unwrap();
        assert!(claims.is_expired(1_700_000_000));
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(decode_unverified("not-a-token").is_err());
    }
}
