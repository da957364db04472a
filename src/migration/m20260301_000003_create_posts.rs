//! Migration: Create posts table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE posts (
                    id UUID PRIMARY KEY,
                    author_id UUID NOT NULL
                        REFERENCES users(id) ON DELETE CASCADE,
                    title VARCHAR(255) NOT NULL,
                    slug VARCHAR(255) NOT NULL,
                    content TEXT NOT NULL,
                    image VARCHAR(500),
                    topic VARCHAR(100),

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE UNIQUE INDEX idx_posts_slug ON posts(slug);
                CREATE INDEX idx_posts_author ON posts(author_id);
                CREATE INDEX idx_posts_topic ON posts(topic);
                CREATE INDEX idx_posts_created_at ON posts(created_at DESC);

                -- Trigger to update updated_at
                CREATE TRIGGER update_posts_updated_at
                    BEFORE UPDATE ON posts
                    FOR EACH ROW
                    EXECUTE FUNCTION update_updated_at_column();
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TRIGGER IF EXISTS update_posts_updated_at ON posts;
                DROP TABLE IF EXISTS posts CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
