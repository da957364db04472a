//! User entity for local and Google-provisioned accounts.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// bcrypt digest; OAuth accounts hold a random unusable placeholder.
    pub password_hash: String,
    pub provider: String,
    pub role: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub niche: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
