//! Comment service: CRUD under the ownership policy.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::policy;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::comment::CommentResponse;
use crate::models::user::Principal;

/// Create a comment on an existing post.
pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    post_id: Uuid,
    content: String,
) -> AppResult<CommentResponse> {
    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::InvalidInput("Content is required".to_string()));
    }

    if db::posts::find_by_id(db, post_id).await?.is_none() {
        return Err(AppError::NotFound("Post".to_string()));
    }

    let comment = db::comments::insert(db, post_id, principal.id, content).await?;
    let author = db::users::find_by_id(db, principal.id).await?;
    Ok((comment, author).into())
}

/// List comments for a post with their authors, newest first.
pub async fn list_for_post(
    db: &DatabaseConnection,
    post_id: Uuid,
) -> AppResult<Vec<CommentResponse>> {
    if db::posts::find_by_id(db, post_id).await?.is_none() {
        return Err(AppError::NotFound("Post".to_string()));
    }

    let comments = db::comments::list_for_post(db, post_id).await?;
    Ok(comments.into_iter().map(CommentResponse::from).collect())
}

/// Update a comment. Owner-or-admin, checked against the stored author
/// before the write.
pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    comment_id: Uuid,
    content: String,
) -> AppResult<CommentResponse> {
    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(AppError::InvalidInput("Content is required".to_string()));
    }

    let comment = db::comments::find_by_id(db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

    policy::require_owner_or_admin(principal, comment.author_id)?;

    let updated = db::comments::update_content(db, comment, content).await?;
    let author = db::users::find_by_id(db, updated.author_id).await?;
    Ok((updated, author).into())
}

/// Delete a comment. Owner-or-admin, checked before the write.
pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    comment_id: Uuid,
) -> AppResult<()> {
    let comment = db::comments::find_by_id(db, comment_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment".to_string()))?;

    policy::require_owner_or_admin(principal, comment.author_id)?;

    db::comments::delete(db, comment_id).await?;
    Ok(())
}
