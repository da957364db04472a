//! Auth service: signup, signin, and the Google OAuth upsert.

use rand::RngExt;
use rand::distr::{Alphanumeric, SampleString};
use sea_orm::DatabaseConnection;
use tracing::info;
use uuid::Uuid;

use crate::auth::{TokenIssuer, password};
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::user::{
    AuthResponse, DEFAULT_PROFILE_PICTURE, GoogleClaims, Provider, Role, SigninRequest,
    SignupRequest,
};

/// Minimum username length.
const USERNAME_MIN_LEN: usize = 3;
/// Minimum password length.
const PASSWORD_MIN_LEN: usize = 8;
/// Maximum length of the derived part of a generated username.
const USERNAME_BASE_MAX_LEN: usize = 16;
/// Attempts at a random-suffix username before falling back to a UUID suffix.
const USERNAME_SUFFIX_ATTEMPTS: usize = 5;
/// Length of the random placeholder password for OAuth-provisioned accounts.
const PLACEHOLDER_PASSWORD_LEN: usize = 32;

/// The password rule, shared by signup and password changes so an account
/// can never rotate onto a password signup would reject.
pub(crate) fn validate_password(password: &str) -> AppResult<()> {
    if password.len() < PASSWORD_MIN_LEN {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }
    let has_letter = password.chars().any(|c| c.is_ascii_alphabetic());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(AppError::InvalidInput(
            "Password must contain a letter and a number".to_string(),
        ));
    }
    Ok(())
}

/// Validate a signup request. Fails with the first violated field's message.
fn validate_signup(req: &SignupRequest) -> AppResult<()> {
    let username = req.username.trim();
    if username.len() < USERNAME_MIN_LEN {
        return Err(AppError::InvalidInput(
            "Username must be at least 3 characters".to_string(),
        ));
    }
    if !username.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::InvalidInput(
            "Username can only contain letters and numbers".to_string(),
        ));
    }

    let email = req.email.trim();
    if email.is_empty() || !email.contains('@') || email.contains(' ') {
        return Err(AppError::InvalidInput("Valid email required".to_string()));
    }

    validate_password(&req.password)
}

/// Register a local account and issue a bearer token.
pub async fn signup(
    db: &DatabaseConnection,
    issuer: &TokenIssuer,
    req: SignupRequest,
) -> AppResult<AuthResponse> {
    validate_signup(&req)?;

    // The only hash for this password; the stored digest never comes back
    // through here.
    let password_hash = password::hash(&req.password)?;

    let user = db::users::insert(
        db,
        db::users::NewUser {
            username: req.username.trim().to_string(),
            email: req.email.trim().to_lowercase(),
            password_hash,
            provider: Provider::Local,
            role: Role::User,
            profile_picture: Some(DEFAULT_PROFILE_PICTURE.to_string()),
            niche: req.niche,
        },
    )
    .await
    .map_err(|e| db::conflict_on_unique(e, "User with this email or username already exists"))?;

    info!("New signup: user='{}' (id={})", user.username, user.id);

    let token = issuer.issue(user.id, Role::parse(&user.role).unwrap_or_default())?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Authenticate a local account and issue a bearer token.
pub async fn signin(
    db: &DatabaseConnection,
    issuer: &TokenIssuer,
    req: SigninRequest,
) -> AppResult<AuthResponse> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::InvalidInput("All fields are required".to_string()));
    }

    let user = db::users::find_by_email(db, &req.email)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

    if Provider::parse(&user.provider) != Some(Provider::Local) {
        return Err(AppError::InvalidInput(
            "Use Google sign-in for this account".to_string(),
        ));
    }

    if !password::verify(&req.password, &user.password_hash) {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = issuer.issue(user.id, Role::parse(&user.role).unwrap_or_default())?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Find or create a user from verified Google identity claims, then issue a
/// bearer token.
///
/// The caller has already verified the ID token with Google and confirmed
/// the email is verified; this service trusts that precondition.
pub async fn google_signin(
    db: &DatabaseConnection,
    issuer: &TokenIssuer,
    claims: GoogleClaims,
) -> AppResult<AuthResponse> {
    let email = claims.email.trim().to_lowercase();
    if email.is_empty() {
        return Err(AppError::InvalidInput(
            "Google account has no email".to_string(),
        ));
    }

    let user = match db::users::find_by_email(db, &email).await? {
        Some(existing) => {
            // Keep a user-chosen picture; only replace a missing or
            // still-default one with the Google photo.
            let stale_picture = existing
                .profile_picture
                .as_deref()
                .is_none_or(|p| p == DEFAULT_PROFILE_PICTURE);
            match claims.picture {
                Some(photo) if stale_picture => {
                    db::users::update_profile_picture(db, existing, photo).await?
                }
                _ => existing,
            }
        }
        None => {
            let display_name = claims.name.as_deref().unwrap_or_else(|| {
                email.split('@').next().unwrap_or("user")
            });
            let username = generate_unique_username(db, display_name).await?;

            // An unusable random placeholder keeps password_hash non-null
            // without ever opening a local signin path.
            let placeholder = random_placeholder_password();
            let password_hash = password::hash(&placeholder)?;

            let created = db::users::insert(
                db,
                db::users::NewUser {
                    username,
                    email,
                    password_hash,
                    provider: Provider::Google,
                    role: Role::User,
                    profile_picture: claims
                        .picture
                        .or_else(|| Some(DEFAULT_PROFILE_PICTURE.to_string())),
                    niche: None,
                },
            )
            .await
            .map_err(|e| {
                db::conflict_on_unique(e, "User with this email or username already exists")
            })?;

            info!(
                "Google signin provisioned user='{}' (id={})",
                created.username, created.id
            );
            created
        }
    };

    let token = issuer.issue(user.id, Role::parse(&user.role).unwrap_or_default())?;
    Ok(AuthResponse {
        token,
        user: user.into(),
    })
}

/// Derive the base of a generated username from a display name: lowercase,
/// alphanumerics only, truncated.
fn username_base(display_name: &str) -> String {
    let base: String = display_name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(USERNAME_BASE_MAX_LEN)
        .collect();
    if base.is_empty() { "user".to_string() } else { base }
}

/// Generate a username unique at the time of the check: base plus a random
/// 4-digit suffix, retried on collision, with a UUID-derived fallback. The
/// unique index remains the final arbiter under concurrent provisioning.
async fn generate_unique_username(
    db: &DatabaseConnection,
    display_name: &str,
) -> AppResult<String> {
    let base = username_base(display_name);

    for _ in 0..USERNAME_SUFFIX_ATTEMPTS {
        let suffix: u32 = rand::rng().random_range(1000..10000);
        let candidate = format!("{}{}", base, suffix);
        if !db::users::username_exists(db, &candidate).await? {
            return Ok(candidate);
        }
    }

    let fallback = Uuid::new_v4().simple().to_string();
    Ok(format!("{}{}", base, &fallback[..8]))
}

/// Random alphanumeric placeholder for OAuth-provisioned accounts.
fn random_placeholder_password() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), PLACEHOLDER_PASSWORD_LEN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> SignupRequest {
        SignupRequest {
            username: "alice123".to_string(),
            email: "A@x.com".to_string(),
            password: "secret12".to_string(),
            niche: None,
        }
    }

    #[test]
    fn test_valid_signup_passes_validation() {
        assert!(validate_signup(&valid_request()).is_ok());
    }

    #[test]
    fn test_short_username_names_the_field() {
        let mut req = valid_request();
        req.username = "ab".to_string();
        match validate_signup(&req) {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains("Username")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_username_with_spaces_is_rejected() {
        let mut req = valid_request();
        req.username = "alice smith".to_string();
        assert!(validate_signup(&req).is_err());
    }

    #[test]
    fn test_password_needs_letter_and_digit() {
        let mut req = valid_request();
        req.password = "abcdefgh".to_string();
        match validate_signup(&req) {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains("Password")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        req.password = "12345678".to_string();
        assert!(validate_signup(&req).is_err());
    }

    #[test]
    fn test_password_rule_applies_outside_signup() {
        // The rule change_password enforces is the same function.
        assert!(validate_password("secret12").is_ok());
        assert!(validate_password("abcdefgh").is_err());
        assert!(validate_password("12345678").is_err());
        assert!(validate_password("a1").is_err());
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let mut req = valid_request();
        req.email = "not-an-email".to_string();
        match validate_signup(&req) {
            Err(AppError::InvalidInput(msg)) => assert!(msg.contains("email")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_username_base_strips_and_truncates() {
        assert_eq!(username_base("Ada Lovelace"), "adalovelace");
        assert_eq!(username_base("Ada! Love-Lace 42"), "adalovelace42");
        assert_eq!(
            username_base("a-very-long-display-name-indeed"),
            "averylongdisplay"
        );
        assert_eq!(username_base("!!!"), "user");
    }

    #[test]
    fn test_placeholder_password_is_long_and_random() {
        let first = random_placeholder_password();
        let second = random_placeholder_password();
        assert_eq!(first.len(), PLACEHOLDER_PASSWORD_LEN);
        assert!(first.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(first, second);
    }
}
