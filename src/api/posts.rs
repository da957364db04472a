//! Post API handlers.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::auth::BearerAuth;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::post::{CreatePostRequest, ListPostsQuery, UpdatePostRequest};
use crate::services::posts as post_service;

/// List the topics in use with post counts, most-used first.
pub async fn list_topics(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let topics = post_service::topics(pool.connection()).await?;
    Ok(HttpResponse::Ok().json(topics))
}

/// List posts with topic/search filters and pagination.
pub async fn list_posts(
    pool: web::Data<DbPool>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let response = post_service::list(pool.connection(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Create a post authored by the authenticated user.
pub async fn create_post(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post =
        post_service::create(pool.connection(), &auth.principal, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(post))
}

/// Fetch a single post.
pub async fn get_post(pool: web::Data<DbPool>, path: web::Path<Uuid>) -> AppResult<HttpResponse> {
    let post = post_service::get(pool.connection(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Update a post. Owner or admin.
pub async fn update_post(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = post_service::update(
        pool.connection(),
        &auth.principal,
        path.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(post))
}

/// Delete a post. Owner or admin.
pub async fn delete_post(
    auth: BearerAuth,
    pool: web::Data<DbPool>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    post_service::delete(pool.connection(), &auth.principal, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure post routes. The topics route is registered before the
/// `{post_id}` route so "topics" is never parsed as an id.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/posts")
            .route(web::get().to(list_posts))
            .route(web::post().to(create_post)),
    )
    .service(web::resource("/posts/topics").route(web::get().to(list_topics)))
    .service(
        web::resource("/posts/{post_id}")
            .route(web::get().to(get_post))
            .route(web::put().to(update_post))
            .route(web::delete().to(delete_post)),
    );
}
