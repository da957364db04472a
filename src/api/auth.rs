//! Authentication API handlers: signup, signin, Google sign-in, and the
//! current-user probe.

use actix_web::{HttpResponse, web};
use tracing::info;

use crate::auth::BearerAuth;
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::user::{GoogleSigninRequest, SigninRequest, SignupRequest};
use crate::services::{self, GoogleTokenVerifier, auth as auth_service};

/// Register a new account.
pub async fn signup(
    pool: web::Data<DbPool>,
    issuer: web::Data<crate::auth::TokenIssuer>,
    body: web::Json<SignupRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service::signup(pool.connection(), &issuer, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(response))
}

/// Sign in with email and password.
pub async fn signin(
    pool: web::Data<DbPool>,
    issuer: web::Data<crate::auth::TokenIssuer>,
    body: web::Json<SigninRequest>,
) -> AppResult<HttpResponse> {
    let response = auth_service::signin(pool.connection(), &issuer, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Sign in with a Google ID token, provisioning an account on first use.
pub async fn google_signin(
    pool: web::Data<DbPool>,
    issuer: web::Data<crate::auth::TokenIssuer>,
    config: web::Data<Config>,
    verifier: Option<web::Data<GoogleTokenVerifier>>,
    body: web::Json<GoogleSigninRequest>,
) -> AppResult<HttpResponse> {
    if !config.google.enabled {
        return Err(AppError::InvalidInput(
            "Google sign-in is not configured".to_string(),
        ));
    }
    let verifier = verifier.ok_or_else(|| {
        AppError::Internal("Google sign-in enabled but verifier missing".to_string())
    })?;

    let claims = verifier.verify_id_token(&body.credential).await?;
    let response = auth_service::google_signin(pool.connection(), &issuer, claims).await?;

    info!("Google sign-in completed: user='{}'", response.user.username);
    Ok(HttpResponse::Ok().json(response))
}

/// Return the profile of the authenticated user.
pub async fn me(auth: BearerAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let profile = services::users::get_profile(pool.connection(), auth.principal.id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Configure auth routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/auth/signup").route(web::post().to(signup)))
        .service(web::resource("/auth/signin").route(web::post().to(signin)))
        .service(web::resource("/auth/google").route(web::post().to(google_signin)))
        .service(web::resource("/auth/me").route(web::get().to(me)));
}
