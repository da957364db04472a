//! Comment API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::comment::{CreateCommentRequest, UpdateCommentRequest};
use crate::services::comments as comment_service;

/// List comments for a post, newest first.
pub async fn list_comments(
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let comments = comment_service::list_for_post(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(comments))
}

/// Create a comment on a post.
pub async fn create_comment(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = comment_service::create(
        pool.connection(),
        &auth.principal,
        path.into_inner(),
        body.into_inner().content,
    )
    .await?;
    Ok(HttpResponse::Created().json(comment))
}

/// Update a comment. Owner or admin.
pub async fn update_comment(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateCommentRequest>,
) -> AppResult<HttpResponse> {
    let comment = comment_service::update(
        pool.connection(),
        &auth.principal,
        path.into_inner(),
        body.into_inner().content,
    )
    .await?;
    Ok(HttpResponse::Ok().json(comment))
}

/// Delete a comment. Owner or admin.
pub async fn delete_comment(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    comment_service::delete(pool.connection(), &auth.principal, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure comment routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts/{post_id}/comments")
            .route(web::get().to(list_comments))
            .route(web::post().to(create_comment)),
    )
    .service(
        web::resource("/comments/{comment_id}")
            .route(web::put().to(update_comment))
            .route(web::delete().to(delete_comment)),
    );
}
