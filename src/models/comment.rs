//! Comment request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity;
use crate::models::user::AuthorSummary;

/// Request to create a comment on a post.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// Request to update a comment.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

/// Comment payload returned by the API, with the author embedded.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author: Option<AuthorSummary>,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<(entity::comment::Model, Option<entity::user::Model>)> for CommentResponse {
    fn from((comment, author): (entity::comment::Model, Option<entity::user::Model>)) -> Self {
        Self {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.author_id,
            author: author.map(AuthorSummary::from),
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_response_embeds_author() {
        let now = Utc::now();
        let author_id = Uuid::new_v4();
        let comment = entity::comment::Model {
            id: Uuid::new_v4(),
            post_id: Uuid::new_v4(),
            author_id,
            content: "Nice post".into(),
            created_at: now,
            updated_at: now,
        };
        let author = entity::user::Model {
            id: author_id,
            username: "bob42".into(),
            email: "b@x.com".into(),
            password_hash: "$2b$10$secret".into(),
            provider: "local".into(),
            role: "user".into(),
            profile_picture: None,
            bio: None,
            niche: None,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(CommentResponse::from((comment, Some(author)))).unwrap();
        assert_eq!(json["author"]["username"], "bob42");
        assert!(json["author"].get("email").is_none());
    }
}
