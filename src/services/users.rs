//! User service: profiles, follow relationships, and admin operations.

use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use crate::auth::{password, policy};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::user::{Principal, ProfileResponse, ProfileUpdateRequest, UserResponse};

/// Fetch a public profile with follower/following counts.
pub async fn get_profile(db: &DatabaseConnection, user_id: Uuid) -> AppResult<ProfileResponse> {
    let user = db::users::find_by_id(db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    let followers = db::follows::count_followers(db, user_id).await?;
    let following = db::follows::count_following(db, user_id).await?;

    Ok(ProfileResponse {
        user: user.into(),
        followers,
        following,
    })
}

/// Update a profile. Owner-or-admin, checked before the write. The update
/// carries no password field, so the stored digest is untouched.
pub async fn update_profile(
    db: &DatabaseConnection,
    principal: &Principal,
    target_id: Uuid,
    req: ProfileUpdateRequest,
) -> AppResult<UserResponse> {
    policy::require_owner_or_admin(principal, target_id)?;

    let user = db::users::find_by_id(db, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if let Some(ref username) = req.username {
        if username.trim().len() < 3 {
            return Err(AppError::InvalidInput(
                "Username must be at least 3 characters".to_string(),
            ));
        }
    }

    let changes = db::users::ProfileChanges {
        username: req.username.map(|u| u.trim().to_string()),
        email: req.email.map(|e| e.trim().to_lowercase()),
        profile_picture: req.profile_picture,
        bio: req.bio,
        niche: req.niche,
    };

    if changes.is_empty() {
        return Ok(user.into());
    }

    let updated = db::users::update_profile(db, user, changes)
        .await
        .map_err(|e| {
            db::conflict_on_unique(e, "User with this email or username already exists")
        })?;

    Ok(updated.into())
}

/// Change a password. Owner-or-admin; the new plaintext is validated and
/// hashed exactly once here.
pub async fn change_password(
    db: &DatabaseConnection,
    principal: &Principal,
    target_id: Uuid,
    new_password: &str,
) -> AppResult<()> {
    policy::require_owner_or_admin(principal, target_id)?;

    // Same rule as signup; a rotated password must still pass it.
    super::auth::validate_password(new_password)?;

    let user = db::users::find_by_id(db, target_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    let password_hash = password::hash(new_password)?;
    db::users::update_password_hash(db, user, password_hash).await?;

    info!("Password changed for user id={}", target_id);
    Ok(())
}

/// Follow a user. Self-follow is rejected before anything else, so
/// `follow(A, A)` fails the same way whether or not A exists.
pub async fn follow(
    db: &DatabaseConnection,
    follower_id: Uuid,
    following_id: Uuid,
) -> AppResult<()> {
    if follower_id == following_id {
        return Err(AppError::InvalidInput(
            "You cannot follow yourself".to_string(),
        ));
    }

    let target = db::users::find_by_id(db, following_id).await?;
    if target.is_none() {
        return Err(AppError::NotFound("User to follow".to_string()));
    }

    if db::follows::exists(db, follower_id, following_id).await? {
        return Err(AppError::Conflict(
            "You are already following this user".to_string(),
        ));
    }

    // The composite key catches the race between the existence check and
    // the insert; the loser still gets Conflict.
    db::follows::insert(db, follower_id, following_id)
        .await
        .map_err(|e| db::conflict_on_unique(e, "You are already following this user"))?;

    Ok(())
}

/// Unfollow a user. Deleting an absent edge is an error, not a no-op.
pub async fn unfollow(
    db: &DatabaseConnection,
    follower_id: Uuid,
    following_id: Uuid,
) -> AppResult<()> {
    let rows = db::follows::delete(db, follower_id, following_id).await?;
    if rows == 0 {
        return Err(AppError::NotFound("Follow relationship".to_string()));
    }
    Ok(())
}

/// List all users. The admin gate lives at the route layer.
pub async fn list_users(db: &DatabaseConnection) -> AppResult<Vec<UserResponse>> {
    let users = db::users::list_all(db).await?;
    Ok(users.into_iter().map(UserResponse::from).collect())
}

/// Delete a user. Posts, comments, and follow edges cascade away with the
/// row. The admin gate lives at the route layer.
pub async fn delete_user(db: &DatabaseConnection, user_id: Uuid) -> AppResult<()> {
    db::users::delete(db, user_id).await?;
    info!("User deleted: id={}", user_id);
    Ok(())
}
