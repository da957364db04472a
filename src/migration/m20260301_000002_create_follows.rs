//! Migration: Create follows table.
//!
//! Directed edges between users. The composite primary key prevents
//! duplicate edges; both foreign keys cascade so deleting a user removes
//! their edges in either direction.

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
                CREATE TABLE follows (
                    follower_id UUID NOT NULL
                        REFERENCES users(id) ON DELETE CASCADE,
                    following_id UUID NOT NULL
                        REFERENCES users(id) ON DELETE CASCADE,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

                    PRIMARY KEY (follower_id, following_id)
                );

                -- Reverse lookup: who follows a given user
                CREATE INDEX idx_follows_following ON follows(following_id);
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP TABLE IF EXISTS follows CASCADE;")
            .await?;

        Ok(())
    }
}
