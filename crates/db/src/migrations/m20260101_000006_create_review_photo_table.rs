//! Create review_photo table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewPhoto::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewPhoto::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ReviewPhoto::ReviewId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(ReviewPhoto::Path).string_len(2083).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_photo_review")
                            .from(ReviewPhoto::Table, ReviewPhoto::ReviewId)
                            .to(Review::Table, Review::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: review_id (bulk photo fetch per review page)
        manager
            .create_index(
                Index::create()
                    .name("idx_review_photo_review_id")
                    .table(ReviewPhoto::Table)
                    .col(ReviewPhoto::ReviewId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewPhoto::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ReviewPhoto {
    Table,
    Id,
    ReviewId,
    Path,
}

#[derive(Iden)]
enum Review {
    Table,
    Id,
}
