//! User models, roles, and auth request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity;

/// Default avatar assigned to accounts without a picture. An OAuth re-login
/// may replace it with the Google photo; a user-chosen picture is kept.
pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://cdn.pixabay.com/photo/2015/10/05/22/37/blank-profile-picture-973460_960_720.png";

/// User roles. Closed enumeration so a typo can never grant privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Contributor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Contributor => "contributor",
            Self::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "user" => Some(Self::User),
            "contributor" => Some(Self::Contributor),
            "admin" => Some(Self::Admin),
            _ => None,
        }
    }

    /// Privilege rank; higher ranks satisfy lower requirements.
    fn rank(&self) -> u8 {
        match self {
            Self::User => 0,
            Self::Contributor => 1,
            Self::Admin => 2,
        }
    }

    /// Whether this role satisfies a required role. Admin passes every check.
    pub fn grants(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Credential origin for a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[default]
    Local,
    Google,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Google => "google",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "local" => Some(Self::Local),
            "google" => Some(Self::Google),
            _ => None,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authenticated identity attached to a request after token
/// verification. Loaded fresh from the store on every request; never
/// carries the password hash.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

impl From<&entity::user::Model> for Principal {
    fn from(m: &entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username.clone(),
            role: Role::parse(&m.role).unwrap_or_default(),
        }
    }
}

/// Author identity embedded in post and comment payloads so clients can
/// render bylines without a lookup per row.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub id: Uuid,
    pub username: String,
    pub profile_picture: Option<String>,
}

impl From<entity::user::Model> for AuthorSummary {
    fn from(m: entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            profile_picture: m.profile_picture,
        }
    }
}

/// User payload returned by the API. Password fields never appear here.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub provider: String,
    pub role: String,
    pub profile_picture: Option<String>,
    pub bio: Option<String>,
    pub niche: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<entity::user::Model> for UserResponse {
    fn from(m: entity::user::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            provider: m.provider,
            role: m.role,
            profile_picture: m.profile_picture,
            bio: m.bio,
            niche: m.niche,
            created_at: m.created_at,
        }
    }
}

/// Public profile with relationship counts.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub followers: u64,
    pub following: u64,
}

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub niche: Option<String>,
}

/// Signin request body.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Google sign-in request body: the ID token obtained by the client.
#[derive(Debug, Deserialize)]
pub struct GoogleSigninRequest {
    pub credential: String,
}

/// Identity claims extracted from a verified Google ID token.
///
/// Producing one of these asserts that the token signature was checked
/// against the configured client id and that the email is verified; the
/// auth service trusts that precondition.
#[derive(Debug, Clone)]
pub struct GoogleClaims {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Profile update request. Deliberately has no password field: password
/// changes go through the dedicated change-password operation so a stored
/// digest can never be re-hashed.
#[derive(Debug, Default, Deserialize)]
pub struct ProfileUpdateRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub niche: Option<String>,
}

/// Change-password request body.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password: String,
}

/// Response for signup/signin/google: a bearer token plus the user payload.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_round_trip() {
        for role in [Role::User, Role::Contributor, Role::Admin] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
    }

    #[test]
    fn test_admin_grants_every_role() {
        for required in [Role::User, Role::Contributor, Role::Admin] {
            assert!(Role::Admin.grants(required));
        }
    }

    #[test]
    fn test_user_never_grants_admin() {
        assert!(!Role::User.grants(Role::Admin));
        assert!(!Role::User.grants(Role::Contributor));
        assert!(Role::User.grants(Role::User));
    }

    #[test]
    fn test_contributor_sits_between_user_and_admin() {
        assert!(Role::Contributor.grants(Role::User));
        assert!(Role::Contributor.grants(Role::Contributor));
        assert!(!Role::Contributor.grants(Role::Admin));
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(Provider::parse("local"), Some(Provider::Local));
        assert_eq!(Provider::parse("google"), Some(Provider::Google));
        assert_eq!(Provider::parse("github"), None);
    }

    #[test]
    fn test_user_response_has_no_password_field() {
        let now = Utc::now();
        let model = entity::user::Model {
            id: Uuid::new_v4(),
            username: "alice123".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$10$secret".into(),
            provider: "local".into(),
            role: "user".into(),
            profile_picture: None,
            bio: None,
            niche: None,
            created_at: now,
            updated_at: now,
        };

        let response = UserResponse::from(model);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice123");
    }
}
