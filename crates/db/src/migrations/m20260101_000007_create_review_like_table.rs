//! Create review_like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewLike::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(ReviewLike::ReviewId).string_len(32).not_null())
                    .col(
                        ColumnDef::new(ReviewLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_like_user")
                            .from(ReviewLike::Table, ReviewLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_like_review")
                            .from(ReviewLike::Table, ReviewLike::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique pair: one like per user per review
        manager
            .create_index(
                Index::create()
                    .name("idx_review_like_user_review")
                    .table(ReviewLike::Table)
                    .col(ReviewLike::UserId)
                    .col(ReviewLike::ReviewId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: review_id (for like counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_like_review_id")
                    .table(ReviewLike::Table)
                    .col(ReviewLike::ReviewId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReviewLike {
    Table,
    Id,
    UserId,
    ReviewId,
    CreatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
}
