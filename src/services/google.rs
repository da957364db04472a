//! Google ID-token verification.
//!
//! Confirms a client-supplied ID token with Google's tokeninfo endpoint,
//! checks the audience against the configured client id, and requires a
//! verified email. Only then are identity claims handed to the auth
//! service, which trusts them.

use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::models::user::GoogleClaims;

/// Google tokeninfo endpoint.
const TOKENINFO_URL: &str = "https://oauth2.googleapis.com/tokeninfo";
/// HTTP connect timeout for Google API calls.
const HTTP_CONNECT_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);
/// HTTP total timeout for Google API calls.
const HTTP_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);

/// Verifies Google ID tokens against a configured OAuth client id.
#[derive(Clone)]
pub struct GoogleTokenVerifier {
    client_id: String,
    http: reqwest::Client,
}

#[derive(Debug, serde::Deserialize)]
struct TokenInfo {
    aud: Option<String>,
    email: Option<String>,
    email_verified: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleTokenVerifier {
    pub fn new(client_id: String) -> Self {
        let http = reqwest::Client::builder()
            .connect_timeout(HTTP_CONNECT_TIMEOUT)
            .timeout(HTTP_REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client for Google token verification");
        Self { client_id, http }
    }

    /// Verify an ID token and return its identity claims.
    ///
    /// Every failure mode (network, bad token, wrong audience, unverified
    /// email) collapses to `Unauthorized`; detail goes to the logs only.
    pub async fn verify_id_token(&self, id_token: &str) -> AppResult<GoogleClaims> {
        let info: TokenInfo = self
            .http
            .get(TOKENINFO_URL)
            .query(&[("id_token", id_token)])
            .send()
            .await
            .map_err(|e| {
                warn!("Google tokeninfo request failed: {}", e);
                AppError::Unauthorized("Google authentication failed".to_string())
            })?
            .error_for_status()
            .map_err(|e| {
                warn!("Google tokeninfo rejected token: {}", e);
                AppError::Unauthorized("Google authentication failed".to_string())
            })?
            .json()
            .await
            .map_err(|e| {
                warn!("Google tokeninfo response unparseable: {}", e);
                AppError::Unauthorized("Google authentication failed".to_string())
            })?;

        if info.aud.as_deref() != Some(self.client_id.as_str()) {
            warn!("Google token audience mismatch");
            return Err(AppError::Unauthorized(
                "Google authentication failed".to_string(),
            ));
        }

        if info.email_verified.as_deref() != Some("true") {
            warn!("Google token email not verified");
            return Err(AppError::Unauthorized(
                "Google authentication failed".to_string(),
            ));
        }

        let email = info.email.filter(|e| !e.is_empty()).ok_or_else(|| {
            warn!("Google token carries no email");
            AppError::Unauthorized("Google authentication failed".to_string())
        })?;

        Ok(GoogleClaims {
            email,
            name: info.name,
            picture: info.picture,
        })
    }
}
