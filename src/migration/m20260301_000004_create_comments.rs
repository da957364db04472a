//! Migration: Create comments table.

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
                CREATE TABLE comments (
                    id UUID PRIMARY KEY,
                    post_id UUID NOT NULL
                        REFERENCES posts(id) ON DELETE CASCADE,
                    author_id UUID NOT NULL
                        REFERENCES users(id) ON DELETE CASCADE,
                    content TEXT NOT NULL,

                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );

                CREATE INDEX idx_comments_post ON comments(post_id, created_at DESC);
                CREATE INDEX idx_comments_author ON comments(author_id);

                -- Trigger to update updated_at
                CREATE TRIGGER update_comments_updated_at
                    BEFORE UPDATE ON comments
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
                DROP TRIGGER IF EXISTS update_comments_updated_at ON comments;
                DROP TABLE IF EXISTS comments CASCADE;
                "#,
            )
            .await?;

        Ok(())
    }
}
