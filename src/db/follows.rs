//! Database operations for follow edges.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;

/// Insert a follow edge. A duplicate violates the composite primary key and
/// surfaces as `DbErr` for the caller to map to `Conflict`.
pub async fn insert(
    db: &DatabaseConnection,
    follower_id: Uuid,
    following_id: Uuid,
) -> Result<(), DbErr> {
    let model = crate::entity::follow::ActiveModel {
        follower_id: Set(follower_id),
        following_id: Set(following_id),
        created_at: Set(Utc::now()),
    };

    crate::entity::follow::Entity::insert(model).exec(db).await?;
    Ok(())
}

/// Delete a follow edge. Returns the number of rows removed; zero means the
/// edge never existed.
pub async fn delete(
    db: &DatabaseConnection,
    follower_id: Uuid,
    following_id: Uuid,
) -> AppResult<u64> {
    let result = crate::entity::follow::Entity::delete_many()
        .filter(crate::entity::follow::Column::FollowerId.eq(follower_id))
        .filter(crate::entity::follow::Column::FollowingId.eq(following_id))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// Check whether an edge already exists.
pub async fn exists(
    db: &DatabaseConnection,
    follower_id: Uuid,
    following_id: Uuid,
) -> AppResult<bool> {
    let count = crate::entity::follow::Entity::find()
        .filter(crate::entity::follow::Column::FollowerId.eq(follower_id))
        .filter(crate::entity::follow::Column::FollowingId.eq(following_id))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Count how many users follow the given user.
pub async fn count_followers(db: &DatabaseConnection, user_id: Uuid) -> AppResult<u64> {
    let count = crate::entity::follow::Entity::find()
        .filter(crate::entity::follow::Column::FollowingId.eq(user_id))
        .count(db)
        .await?;
    Ok(count)
}

/// Count how many users the given user follows.
pub async fn count_following(db: &DatabaseConnection, user_id: Uuid) -> AppResult<u64> {
    let count = crate::entity::follow::Entity::find()
        .filter(crate::entity::follow::Column::FollowerId.eq(user_id))
        .count(db)
        .await?;
    Ok(count)
}
