//! Post request/response types.

use chrono::{DateTime, Utc};
use sea_orm::FromQueryResult;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity;
use crate::models::user::AuthorSummary;

/// Request to create a post.
#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Request to update a post. All fields optional; the slug is regenerated
/// when the title changes.
#[derive(Debug, Default, Deserialize)]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub topic: Option<String>,
}

/// Query parameters for listing posts.
#[derive(Debug, Default, Deserialize)]
pub struct ListPostsQuery {
    #[serde(default)]
    pub topic: Option<String>,
    /// Case-insensitive substring match against title, content, or slug.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_list_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_list_limit() -> u64 {
    20
}

/// Post payload returned by the API, with the author embedded.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author: Option<AuthorSummary>,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub image: Option<String>,
    pub topic: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(entity::post::Model, Option<entity::user::Model>)> for PostResponse {
    fn from((post, author): (entity::post::Model, Option<entity::user::Model>)) -> Self {
        Self {
            id: post.id,
            author_id: post.author_id,
            author: author.map(AuthorSummary::from),
            title: post.title,
            slug: post.slug,
            content: post.content,
            image: post.image,
            topic: post.topic,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}

/// Response for the post listing endpoint.
#[derive(Debug, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostResponse>,
    pub total: u64,
}

/// One row of the topic listing: a topic and how many posts carry it.
#[derive(Debug, Serialize, FromQueryResult)]
pub struct TopicCount {
    pub topic: String,
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_model(author_id: Uuid) -> entity::post::Model {
        let now = Utc::now();
        entity::post::Model {
            id: Uuid::new_v4(),
            author_id,
            title: "Hello World".into(),
            slug: "hello-world".into(),
            content: "body".into(),
            image: None,
            topic: Some("rust".into()),
            created_at: now,
            updated_at: now,
        }
    }

    fn author_model(id: Uuid) -> entity::user::Model {
        let now = Utc::now();
        entity::user::Model {
            id,
            username: "alice123".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$10$secret".into(),
            provider: "local".into(),
            role: "user".into(),
            profile_picture: Some("https://example.com/p.png".into()),
            bio: None,
            niche: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_post_response_embeds_author_without_password() {
        let author_id = Uuid::new_v4();
        let response = PostResponse::from((post_model(author_id), Some(author_model(author_id))));

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["author"]["username"], "alice123");
        assert_eq!(
            json["author"]["profile_picture"],
            "https://example.com/p.png"
        );
        assert!(json["author"].get("email").is_none());
        assert!(json["author"].get("password_hash").is_none());
    }

    #[test]
    fn test_post_response_tolerates_missing_author() {
        let response = PostResponse::from((post_model(Uuid::new_v4()), None));
        let json = serde_json::to_value(&response).unwrap();
        assert!(json["author"].is_null());
    }

    #[test]
    fn test_topic_count_serializes_topic_and_count() {
        let row = TopicCount {
            topic: "rust".into(),
            count: 3,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["topic"], "rust");
        assert_eq!(json["count"], 3);
    }
}
