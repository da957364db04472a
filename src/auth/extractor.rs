//! Actix-web extractor for bearer-token authentication.
//!
//! Per-request state machine: no token → 401; token present → verify →
//! load the current user row (password excluded) → attach the principal.
//! A stale or deleted user id yields 401, not a crash. Role checks run
//! afterwards via `policy::require_role` and fail 403, a distinct signal.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use futures_util::future::LocalBoxFuture;

use crate::auth::TokenIssuer;
use crate::db::{self, DbPool};
use crate::error::ErrorResponse;
use crate::models::user::Principal;

/// Parse the token out of an `Authorization: Bearer <token>` header value.
/// Only the bearer scheme is accepted; there is no cookie fallback.
fn parse_bearer(header: Option<&str>) -> Option<&str> {
    let value = header?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() { None } else { Some(token) }
}

/// Authentication error for the extractor. Always maps to 401.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl AuthError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Extractor that requires a valid bearer token.
///
/// Use this in handlers that require authentication:
/// ```ignore
/// async fn protected_handler(auth: BearerAuth) -> impl Responder {
///     // auth.principal is the authenticated identity
/// }
/// ```
pub struct BearerAuth {
    pub principal: Principal,
}

impl FromRequest for BearerAuth {
    type Error = AuthError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let pool = req.app_data::<web::Data<DbPool>>().cloned();
        let issuer = req.app_data::<web::Data<TokenIssuer>>().cloned();
        let token = parse_bearer(
            req.headers()
                .get(actix_web::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok()),
        )
        .map(|t| t.to_string());

        Box::pin(async move {
            let (pool, issuer) = match (pool, issuer) {
                (Some(p), Some(i)) => (p, i),
                _ => return Err(AuthError::new("Internal configuration error")),
            };

            let token = token.ok_or_else(|| AuthError::new("Not authorized, no token"))?;

            let claims = issuer
                .verify(&token)
                .map_err(|_| AuthError::new("Not authorized, token failed"))?;

            // Re-read the user on every request so role changes and
            // deletions take effect without waiting for token expiry.
            let user = db::users::find_by_id(pool.connection(), claims.sub)
                .await
                .map_err(|_| AuthError::new("Not authorized, token failed"))?
                .ok_or_else(|| {
                    AuthError::new("The user belonging to this token no longer exists")
                })?;

            Ok(BearerAuth {
                principal: Principal::from(&user),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_accepts_bearer_scheme_only() {
        assert_eq!(parse_bearer(Some("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(parse_bearer(Some("Basic dXNlcjpwYXNz")), None);
        assert_eq!(parse_bearer(Some("bearer abc")), None);
    }

    #[test]
    fn test_parse_bearer_rejects_missing_or_empty_token() {
        assert_eq!(parse_bearer(None), None);
        assert_eq!(parse_bearer(Some("Bearer ")), None);
        assert_eq!(parse_bearer(Some("Bearer   ")), None);
    }

    #[test]
    fn test_auth_error_maps_to_401() {
        let err = AuthError::new("no token");
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
