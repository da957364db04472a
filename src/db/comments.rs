//! Database operations for comments.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;

/// Insert a new comment.
pub async fn insert(
    db: &DatabaseConnection,
    post_id: Uuid,
    author_id: Uuid,
    content: String,
) -> AppResult<crate::entity::comment::Model> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let model = crate::entity::comment::ActiveModel {
        id: Set(id),
        post_id: Set(post_id),
        author_id: Set(author_id),
        content: Set(content),
        created_at: Set(now),
        updated_at: Set(now),
    };

    crate::entity::comment::Entity::insert(model).exec(db).await?;

    let inserted = crate::entity::comment::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| {
            crate::error::AppError::Database("Failed to fetch newly inserted comment".to_string())
        })?;

    Ok(inserted)
}

/// Find a comment by ID.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<Option<crate::entity::comment::Model>> {
    let result = crate::entity::comment::Entity::find_by_id(id).one(db).await?;
    Ok(result)
}

/// List comments for a post with their authors, newest first.
pub async fn list_for_post(
    db: &DatabaseConnection,
    post_id: Uuid,
) -> AppResult<Vec<(crate::entity::comment::Model, Option<crate::entity::user::Model>)>> {
    let comments = crate::entity::comment::Entity::find()
        .filter(crate::entity::comment::Column::PostId.eq(post_id))
        .find_also_related(crate::entity::user::Entity)
        .order_by_desc(crate::entity::comment::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(comments)
}

/// Replace a comment's content.
pub async fn update_content(
    db: &DatabaseConnection,
    comment: crate::entity::comment::Model,
    content: String,
) -> AppResult<crate::entity::comment::Model> {
    let mut active: crate::entity::comment::ActiveModel = comment.into();
    active.content = Set(content);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;
    Ok(updated)
}

/// Delete a comment.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<u64> {
    let result = crate::entity::comment::Entity::delete_by_id(id)
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}
