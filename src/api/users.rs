//! User API handlers: profiles, follows, and admin operations.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::{BearerAuth, policy};
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::user::{ChangePasswordRequest, ProfileUpdateRequest, Role};
use crate::services::users as user_service;

/// List all users. Admin only.
pub async fn list_users(auth: BearerAuth, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    policy::require_role(&auth.principal, Role::Admin)?;
    let users = user_service::list_users(pool.connection()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Fetch a public profile with follower counts.
pub async fn get_profile(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let profile = user_service::get_profile(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// Update a profile. Owner or admin.
pub async fn update_profile(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ProfileUpdateRequest>,
) -> AppResult<HttpResponse> {
    let user = user_service::update_profile(
        pool.connection(),
        &auth.principal,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Change a password. Owner or admin.
pub async fn change_password(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<ChangePasswordRequest>,
) -> AppResult<HttpResponse> {
    user_service::change_password(
        pool.connection(),
        &auth.principal,
        path.into_inner(),
        &body.password,
    )
    .await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Password updated"
    })))
}

/// Delete a user. Admin only.
pub async fn delete_user(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    policy::require_role(&auth.principal, Role::Admin)?;
    user_service::delete_user(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Follow a user.
pub async fn follow(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    user_service::follow(pool.connection(), auth.principal.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Followed"
    })))
}

/// Unfollow a user.
pub async fn unfollow(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    user_service::unfollow(pool.connection(), auth.principal.id, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Unfollowed"
    })))
}

/// Configure user routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::get().to(list_users)))
        .service(
            web::resource("/users/{user_id}")
                .route(web::get().to(get_profile))
                .route(web::put().to(update_profile))
                .route(web::delete().to(delete_user)),
        )
        .service(web::resource("/users/{user_id}/password").route(web::put().to(change_password)))
        .service(
            web::resource("/users/{user_id}/follow")
                .route(web::post().to(follow))
                .route(web::delete().to(unfollow)),
        );
}
