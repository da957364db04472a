//! Stateless bearer token issuance and verification.
//!
//! HS256 JWTs carrying the subject id and role. There is no server-side
//! revocation list; a token stays valid until its natural expiry.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::error::{AppError, AppResult};
use crate::models::user::Role;

/// Token issuer claim.
pub const TOKEN_ISSUER: &str = "quill";

/// Claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,
    pub iss: String,
    pub iat: i64,
    pub exp: i64,
    pub role: Role,
}

/// Signs and verifies bearer tokens. Constructed from explicit settings at
/// startup; the signing secret is never read from a global.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: chrono::Duration,
}

impl TokenIssuer {
    pub fn new(settings: &AuthSettings) -> Self {
        let secret = settings.jwt_secret.expose_secret().as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl: chrono::Duration::days(settings.token_ttl_days),
        }
    }

    /// Issue a signed token asserting `{user_id, role}` until expiry.
    pub fn issue(&self, user_id: Uuid, role: Role) -> AppResult<String> {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            role,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to sign token: {}", e)))
    }

    /// Verify a token and return its claims.
    ///
    /// Malformed, mis-signed, wrong-issuer, and expired tokens all collapse
    /// to `Unauthorized`; the caller learns nothing beyond "not authorized".
    pub fn verify(&self, token: &str) -> AppResult<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.validate_aud = false;
        // No clock leeway: an expired token is rejected immediately.
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| AppError::Unauthorized("Not authorized, token failed".to_string()))
    }

    #[cfg(test)]
    fn issue_with_ttl(&self, user_id: Uuid, role: Role, ttl: chrono::Duration) -> String {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: user_id,
            iss: TOKEN_ISSUER.to_string(),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            role,
        };
        encode(&Header::default(), &claims, &self.encoding_key).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn issuer_with_secret(secret: &str) -> TokenIssuer {
        TokenIssuer::new(&AuthSettings {
            jwt_secret: SecretString::from(secret),
            token_ttl_days: 7,
        })
    }

    #[test]
    fn test_issue_verify_round_trip_preserves_identity_and_role() {
        let issuer = issuer_with_secret("test-secret");
        let user_id = Uuid::new_v4();

        let token = issuer.issue(user_id, Role::Contributor).unwrap();
        let claims = issuer.verify(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, Role::Contributor);
        assert_eq!(claims.iss, TOKEN_ISSUER);
    }

    #[test]
    fn test_expired_token_is_unauthorized() {
        let issuer = issuer_with_secret("test-secret");
        // Expired two seconds ago; zero leeway means immediate rejection.
        let token = issuer.issue_with_ttl(
            Uuid::new_v4(),
            Role::User,
            chrono::Duration::seconds(-2),
        );

        match issuer.verify(&token) {
            Err(AppError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got {:?}", other),
        }
    }

    #[test]
    fn test_token_signed_with_other_secret_is_unauthorized() {
        let issuer = issuer_with_secret("test-secret");
        let impostor = issuer_with_secret("other-secret");

        let token = impostor.issue(Uuid::new_v4(), Role::Admin).unwrap();
        assert!(matches!(
            issuer.verify(&token),
            Err(AppError::Unauthorized(_))
        ));
    }

    #[test]
    fn test_malformed_token_is_unauthorized() {
        let issuer = issuer_with_secret("test-secret");
        assert!(matches!(
            issuer.verify("not.a.jwt"),
            Err(AppError::Unauthorized(_))
        ));
    }
}
