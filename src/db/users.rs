//! Database operations for users.

use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::user::{Provider, Role};

/// Fields for a new user row. The password hash is computed by the caller
/// exactly once per logical password change; this layer never hashes.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    /// Must already be lowercased by the caller.
    pub email: String,
    pub password_hash: String,
    pub provider: Provider,
    pub role: Role,
    pub profile_picture: Option<String>,
    pub niche: Option<String>,
}

/// Profile fields that may change through the update endpoint. There is
/// deliberately no password field here.
#[derive(Debug, Default, Clone)]
pub struct ProfileChanges {
    pub username: Option<String>,
    pub email: Option<String>,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub niche: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.profile_picture.is_none()
            && self.bio.is_none()
            && self.niche.is_none()
    }
}

/// Insert a new user. Unique violations surface as `DbErr`; callers map
/// them to `Conflict` via `db::conflict_on_unique`.
pub async fn insert(
    db: &DatabaseConnection,
    new_user: NewUser,
) -> Result<crate::entity::user::Model, DbErr> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let model = crate::entity::user::ActiveModel {
        id: Set(id),
        username: Set(new_user.username),
        email: Set(new_user.email),
        password_hash: Set(new_user.password_hash),
        provider: Set(new_user.provider.as_str().to_string()),
        role: Set(new_user.role.as_str().to_string()),
        profile_picture: Set(new_user.profile_picture),
        bio: Set(None),
        niche: Set(new_user.niche),
        created_at: Set(now),
        updated_at: Set(now),
    };

    crate::entity::user::Entity::insert(model).exec(db).await?;

    crate::entity::user::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Failed to fetch newly inserted user".to_string()))
}

/// Find a user by ID.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<Option<crate::entity::user::Model>> {
    let result = crate::entity::user::Entity::find_by_id(id).one(db).await?;
    Ok(result)
}

/// Find a user by email. The lookup is always against the lowercased form,
/// matching the normalization applied on every write path.
pub async fn find_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> AppResult<Option<crate::entity::user::Model>> {
    let result = crate::entity::user::Entity::find()
        .filter(crate::entity::user::Column::Email.eq(email.to_lowercase()))
        .one(db)
        .await?;
    Ok(result)
}

/// Check whether a username is taken.
pub async fn username_exists(db: &DatabaseConnection, username: &str) -> AppResult<bool> {
    let count = crate::entity::user::Entity::find()
        .filter(crate::entity::user::Column::Username.eq(username))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// List all users, newest first.
pub async fn list_all(db: &DatabaseConnection) -> AppResult<Vec<crate::entity::user::Model>> {
    let users = crate::entity::user::Entity::find()
        .order_by_desc(crate::entity::user::Column::CreatedAt)
        .all(db)
        .await?;
    Ok(users)
}

/// Apply profile changes to an existing user. Unique violations surface as
/// `DbErr` for the caller to map to `Conflict`.
pub async fn update_profile(
    db: &DatabaseConnection,
    user: crate::entity::user::Model,
    changes: ProfileChanges,
) -> Result<crate::entity::user::Model, DbErr> {
    let mut active: crate::entity::user::ActiveModel = user.into();

    if let Some(username) = changes.username {
        active.username = Set(username);
    }
    if let Some(email) = changes.email {
        active.email = Set(email.to_lowercase());
    }
    if let Some(picture) = changes.profile_picture {
        active.profile_picture = Set(Some(picture));
    }
    if let Some(bio) = changes.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(niche) = changes.niche {
        active.niche = Set(Some(niche));
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

/// Replace the stored password hash. The caller has hashed the new
/// plaintext exactly once; nothing here ever re-hashes a stored digest.
pub async fn update_password_hash(
    db: &DatabaseConnection,
    user: crate::entity::user::Model,
    password_hash: String,
) -> AppResult<crate::entity::user::Model> {
    let mut active: crate::entity::user::ActiveModel = user.into();
    active.password_hash = Set(password_hash);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;
    Ok(updated)
}

/// Replace the stored profile picture (OAuth photo refresh).
pub async fn update_profile_picture(
    db: &DatabaseConnection,
    user: crate::entity::user::Model,
    picture: String,
) -> AppResult<crate::entity::user::Model> {
    let mut active: crate::entity::user::ActiveModel = user.into();
    active.profile_picture = Set(Some(picture));
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;
    Ok(updated)
}

/// Hard-delete a user. Posts, comments, and follow edges go with it via
/// the cascading foreign keys.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<()> {
    let result = crate::entity::user::Entity::delete_by_id(id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("User".to_string()));
    }
    Ok(())
}
