//! Database operations for posts.

use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::*;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::post::{ListPostsQuery, TopicCount};

/// Fields for a new post row.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub author_id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub image: Option<String>,
    pub topic: Option<String>,
}

/// Insert a new post. A slug collision violates the unique index and
/// surfaces as `DbErr` for the caller.
pub async fn insert(
    db: &DatabaseConnection,
    new_post: NewPost,
) -> Result<crate::entity::post::Model, DbErr> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    let model = crate::entity::post::ActiveModel {
        id: Set(id),
        author_id: Set(new_post.author_id),
        title: Set(new_post.title),
        slug: Set(new_post.slug),
        content: Set(new_post.content),
        image: Set(new_post.image),
        topic: Set(new_post.topic),
        created_at: Set(now),
        updated_at: Set(now),
    };

    crate::entity::post::Entity::insert(model).exec(db).await?;

    crate::entity::post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("Failed to fetch newly inserted post".to_string()))
}

/// Find a post by ID.
pub async fn find_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<Option<crate::entity::post::Model>> {
    let result = crate::entity::post::Entity::find_by_id(id).one(db).await?;
    Ok(result)
}

/// Find a post by ID with its author row joined in.
pub async fn find_by_id_with_author(
    db: &DatabaseConnection,
    id: Uuid,
) -> AppResult<Option<(crate::entity::post::Model, Option<crate::entity::user::Model>)>> {
    let result = crate::entity::post::Entity::find_by_id(id)
        .find_also_related(crate::entity::user::Entity)
        .one(db)
        .await?;
    Ok(result)
}

/// Find a post by slug.
pub async fn find_by_slug(
    db: &DatabaseConnection,
    slug: &str,
) -> AppResult<Option<crate::entity::post::Model>> {
    let result = crate::entity::post::Entity::find()
        .filter(crate::entity::post::Column::Slug.eq(slug))
        .one(db)
        .await?;
    Ok(result)
}

/// Build the filtered post listing query. Search lowercases both sides so
/// `search=Rust` matches "rust".
fn list_query(query: &ListPostsQuery) -> Select<crate::entity::post::Entity> {
    let mut select = crate::entity::post::Entity::find();

    if let Some(ref topic) = query.topic {
        select = select.filter(crate::entity::post::Column::Topic.eq(topic.clone()));
    }

    if let Some(ref search) = query.search {
        let pattern = format!("%{}%", search.to_lowercase());
        let matches = |col: crate::entity::post::Column| {
            Expr::expr(Func::lower(Expr::col(col))).like(pattern.clone())
        };
        select = select.filter(
            Condition::any()
                .add(matches(crate::entity::post::Column::Title))
                .add(matches(crate::entity::post::Column::Content))
                .add(matches(crate::entity::post::Column::Slug)),
        );
    }

    select
}

/// List posts with their authors, newest first, with optional topic and
/// search filters. Returns the page plus the total count matching the
/// filters.
pub async fn list(
    db: &DatabaseConnection,
    query: &ListPostsQuery,
) -> AppResult<(
    Vec<(crate::entity::post::Model, Option<crate::entity::user::Model>)>,
    u64,
)> {
    let select = list_query(query);
    let total = select.clone().count(db).await?;

    let limit = Ord::min(query.limit, 100);
    let posts = select
        .find_also_related(crate::entity::user::Entity)
        .order_by_desc(crate::entity::post::Column::CreatedAt)
        .offset(query.offset)
        .limit(limit)
        .all(db)
        .await?;

    Ok((posts, total))
}

/// Build the topic aggregation query: distinct non-empty topics with post
/// counts, most-used first.
fn topics_query() -> Select<crate::entity::post::Entity> {
    crate::entity::post::Entity::find()
        .select_only()
        .column(crate::entity::post::Column::Topic)
        .column_as(crate::entity::post::Column::Id.count(), "count")
        .filter(crate::entity::post::Column::Topic.is_not_null())
        .filter(crate::entity::post::Column::Topic.ne(""))
        .group_by(crate::entity::post::Column::Topic)
        .order_by_desc(crate::entity::post::Column::Id.count())
}

/// List the topics in use with how many posts carry each.
pub async fn topics(db: &DatabaseConnection) -> AppResult<Vec<TopicCount>> {
    let rows = topics_query().into_model::<TopicCount>().all(db).await?;
    Ok(rows)
}

/// Fields that may change through the update endpoint.
#[derive(Debug, Default, Clone)]
pub struct PostChanges {
    pub title: Option<String>,
    /// Regenerated by the service when the title changes.
    pub slug: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
    pub topic: Option<String>,
}

/// Apply changes to an existing post.
pub async fn update(
    db: &DatabaseConnection,
    post: crate::entity::post::Model,
    changes: PostChanges,
) -> Result<crate::entity::post::Model, DbErr> {
    let mut active: crate::entity::post::ActiveModel = post.into();

    if let Some(title) = changes.title {
        active.title = Set(title);
    }
    if let Some(slug) = changes.slug {
        active.slug = Set(slug);
    }
    if let Some(content) = changes.content {
        active.content = Set(content);
    }
    if let Some(image) = changes.image {
        active.image = Set(Some(image));
    }
    if let Some(topic) = changes.topic {
        active.topic = Set(Some(topic));
    }
    active.updated_at = Set(Utc::now());

    active.update(db).await
}

/// Delete a post. Comments go with it via the cascading foreign key.
pub async fn delete(db: &DatabaseConnection, id: Uuid) -> AppResult<u64> {
    let result = crate::entity::post::Entity::delete_by_id(id).exec(db).await?;
    Ok(result.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql(select: Select<crate::entity::post::Entity>) -> String {
        select.build(DbBackend::Postgres).to_string()
    }

    #[test]
    fn test_search_filter_lowercases_both_sides() {
        let query = ListPostsQuery {
            search: Some("Rust".to_string()),
            ..Default::default()
        };
        let sql = sql(list_query(&query));

        assert!(sql.contains("LOWER"));
        assert!(sql.contains("%rust%"));
        assert!(!sql.contains("%Rust%"));
    }

    #[test]
    fn test_list_query_without_filters_has_no_where_clause() {
        let sql = sql(list_query(&ListPostsQuery::default()));
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_topics_query_groups_and_orders_by_count() {
        let sql = sql(topics_query());

        assert!(sql.contains("GROUP BY"));
        assert!(sql.contains("COUNT"));
        assert!(sql.contains("ORDER BY"));
        assert!(sql.contains("DESC"));
        assert!(sql.contains("IS NOT NULL"));
    }
}
