//! Create review table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Review::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Review::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::ExhibitionId).string_len(32).not_null())
                    .col(ColumnDef::new(Review::Title).string_len(50).not_null())
                    .col(ColumnDef::new(Review::Content).text().not_null())
                    .col(ColumnDef::new(Review::Date).date().not_null())
                    .col(
                        ColumnDef::new(Review::IsPublic)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Review::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Review::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Review::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_user")
                            .from(Review::Table, Review::UserId)
                            .to(User::Table, User::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_exhibition")
                            .from(Review::Table, Review::ExhibitionId)
                            .to(Exhibition::Table, Exhibition::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: exhibition_id (per-exhibition listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_exhibition_id")
                    .table(Review::Table)
                    .col(Review::ExhibitionId)
                    .to_owned(),
            )
            .await?;

        // Index: user_id (per-author listing, visibility checks)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_user_id")
                    .table(Review::Table)
                    .col(Review::UserId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Review::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
    UserId,
    ExhibitionId,
    Title,
    Content,
    Date,
    IsPublic,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum User {
    Table,
    Id,
}

#[derive(Iden)]
enum Exhibition {
    Table,
    Id,
}
