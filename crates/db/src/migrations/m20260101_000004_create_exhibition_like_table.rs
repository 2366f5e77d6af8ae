//! Create exhibition_like table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ExhibitionLike::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExhibitionLike::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExhibitionLike::UserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExhibitionLike::ExhibitionId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExhibitionLike::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exhibition_like_user")
                            .from(ExhibitionLike::Table, ExhibitionLike::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exhibition_like_exhibition")
                            .from(ExhibitionLike::Table, ExhibitionLike::ExhibitionId)
                            .to(Exhibition::Table, Exhibition::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique pair: one like per user per exhibition. Concurrent toggle
        // races resolve here, not in application code.
        manager
            .create_index(
                Index::create()
                    .name("idx_exhibition_like_user_exhibition")
                    .table(ExhibitionLike::Table)
                    .col(ExhibitionLike::UserId)
                    .col(ExhibitionLike::ExhibitionId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: exhibition_id (for like counts)
        manager
            .create_index(
                Index::create()
                    .name("idx_exhibition_like_exhibition_id")
                    .table(ExhibitionLike::Table)
                    .col(ExhibitionLike::ExhibitionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ExhibitionLike::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ExhibitionLike {
    Table,
    Id,
    UserId,
    ExhibitionId,
    CreatedAt,
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
