//! Post service: CRUD with slug generation and the ownership policy.

use chrono::Utc;
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::policy;
use crate::db;
use crate::error::{AppError, AppResult};
use crate::models::post::{
    CreatePostRequest, ListPostsQuery, PostListResponse, PostResponse, TopicCount,
    UpdatePostRequest,
};
use crate::models::user::Principal;

/// Minimum title length.
const TITLE_MIN_LEN: usize = 5;

/// Derive a URL slug from a title: lowercase, spaces to hyphens, drop
/// everything else.
fn slugify(title: &str) -> String {
    title
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}

/// Whether a slug lookup hit counts as a collision. A post being edited
/// keeps its own slug, so its own row is not a collision.
fn slug_taken_by_other(
    existing: Option<&crate::entity::post::Model>,
    editing: Option<Uuid>,
) -> bool {
    existing.is_some_and(|p| editing != Some(p.id))
}

/// Pick a slug for a title, appending a timestamp when another post already
/// holds the plain slug. `editing` excludes the post being updated from the
/// collision check so an unchanged title keeps a stable slug.
async fn unique_slug(
    db: &DatabaseConnection,
    title: &str,
    editing: Option<Uuid>,
) -> AppResult<String> {
    let slug = slugify(title);
    let existing = db::posts::find_by_slug(db, &slug).await?;
    if slug_taken_by_other(existing.as_ref(), editing) {
        return Ok(format!("{}-{}", slug, Utc::now().timestamp_millis()));
    }
    Ok(slug)
}

/// Create a post authored by the principal.
pub async fn create(
    db: &DatabaseConnection,
    principal: &Principal,
    req: CreatePostRequest,
) -> AppResult<PostResponse> {
    let title = req.title.trim();
    if title.len() < TITLE_MIN_LEN {
        return Err(AppError::InvalidInput(
            "Title must be at least 5 characters".to_string(),
        ));
    }
    if req.content.trim().is_empty() {
        return Err(AppError::InvalidInput("Content is required".to_string()));
    }

    let slug = unique_slug(db, title, None).await?;

    let post = db::posts::insert(
        db,
        db::posts::NewPost {
            author_id: principal.id,
            title: title.to_string(),
            slug,
            content: req.content,
            image: req.image,
            topic: req.topic,
        },
    )
    .await
    .map_err(|e| db::conflict_on_unique(e, "A post with this slug already exists"))?;

    let author = db::users::find_by_id(db, principal.id).await?;
    Ok((post, author).into())
}

/// Fetch a single post with its author.
pub async fn get(db: &DatabaseConnection, post_id: Uuid) -> AppResult<PostResponse> {
    let (post, author) = db::posts::find_by_id_with_author(db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;
    Ok((post, author).into())
}

/// List posts with filters and pagination.
pub async fn list(db: &DatabaseConnection, query: ListPostsQuery) -> AppResult<PostListResponse> {
    let (posts, total) = db::posts::list(db, &query).await?;
    Ok(PostListResponse {
        posts: posts.into_iter().map(PostResponse::from).collect(),
        total,
    })
}

/// List the topics in use, most-used first.
pub async fn topics(db: &DatabaseConnection) -> AppResult<Vec<TopicCount>> {
    db::posts::topics(db).await
}

/// Update a post. Owner-or-admin, checked against the stored author before
/// the write; the slug is regenerated when the title changes.
pub async fn update(
    db: &DatabaseConnection,
    principal: &Principal,
    post_id: Uuid,
    req: UpdatePostRequest,
) -> AppResult<PostResponse> {
    let post = db::posts::find_by_id(db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

    policy::require_owner_or_admin(principal, post.author_id)?;

    let slug = match req.title {
        Some(ref title) => {
            if title.trim().len() < TITLE_MIN_LEN {
                return Err(AppError::InvalidInput(
                    "Title must be at least 5 characters".to_string(),
                ));
            }
            Some(unique_slug(db, title.trim(), Some(post_id)).await?)
        }
        None => None,
    };

    let updated = db::posts::update(
        db,
        post,
        db::posts::PostChanges {
            title: req.title.map(|t| t.trim().to_string()),
            slug,
            content: req.content,
            image: req.image,
            topic: req.topic,
        },
    )
    .await
    .map_err(|e| db::conflict_on_unique(e, "A post with this slug already exists"))?;

    let author = db::users::find_by_id(db, updated.author_id).await?;
    Ok((updated, author).into())
}

/// Delete a post. Owner-or-admin, checked before the write.
pub async fn delete(
    db: &DatabaseConnection,
    principal: &Principal,
    post_id: Uuid,
) -> AppResult<()> {
    let post = db::posts::find_by_id(db, post_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Post".to_string()))?;

    policy::require_owner_or_admin(principal, post.author_id)?;

    db::posts::delete(db, post_id).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_with_slug(slug: &str) -> crate::entity::post::Model {
        let now = Utc::now();
        crate::entity::post::Model {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            title: "Hello World".to_string(),
            slug: slug.to_string(),
            content: "body".to_string(),
            image: None,
            topic: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("  Rust   in 2026! "), "rust-in-2026");
        assert_eq!(slugify("C'est la vie"), "cest-la-vie");
    }

    #[test]
    fn test_slugify_drops_non_ascii_punctuation() {
        assert_eq!(slugify("What's new?!"), "whats-new");
    }

    #[test]
    fn test_own_row_is_not_a_slug_collision() {
        let post = post_with_slug("hello-world");
        assert!(!slug_taken_by_other(Some(&post), Some(post.id)));
    }

    #[test]
    fn test_another_posts_slug_is_a_collision() {
        let post = post_with_slug("hello-world");
        assert!(slug_taken_by_other(Some(&post), Some(Uuid::new_v4())));
        assert!(slug_taken_by_other(Some(&post), None));
    }

    #[test]
    fn test_free_slug_is_not_a_collision() {
        assert!(!slug_taken_by_other(None, None));
        assert!(!slug_taken_by_other(None, Some(Uuid::new_v4())));
    }
}
