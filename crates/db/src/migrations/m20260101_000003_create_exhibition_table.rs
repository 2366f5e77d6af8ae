//! Create exhibition table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Exhibition::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Exhibition::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Exhibition::Name).string_len(100).not_null())
                    .col(ColumnDef::new(Exhibition::StartDate).date().not_null())
                    .col(ColumnDef::new(Exhibition::EndDate).date().not_null())
                    .col(ColumnDef::new(Exhibition::Genre).string_len(16).not_null())
                    .col(ColumnDef::new(Exhibition::Latitude).double().not_null())
                    .col(ColumnDef::new(Exhibition::Longitude).double().not_null())
                    .col(ColumnDef::new(Exhibition::Area).string_len(16).not_null())
                    .col(ColumnDef::new(Exhibition::Place).string_len(100).not_null())
                    .col(ColumnDef::new(Exhibition::Address).string_len(300).not_null())
                    .col(ColumnDef::new(Exhibition::Inquiry).string_len(100).not_null())
                    .col(ColumnDef::new(Exhibition::Fee).string_len(1000).not_null())
                    .col(ColumnDef::new(Exhibition::Url).string_len(2083).not_null())
                    .col(
                        ColumnDef::new(Exhibition::Thumbnail)
                            .string_len(2083)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Exhibition::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Exhibition::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Exhibition::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: end_date (include-ended cutoff appears in most listings)
        manager
            .create_index(
                Index::create()
                    .name("idx_exhibition_end_date")
                    .table(Exhibition::Table)
                    .col(Exhibition::EndDate)
                    .to_owned(),
            )
            .await?;

        // Index: area (multi-select filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_exhibition_area")
                    .table(Exhibition::Table)
                    .col(Exhibition::Area)
                    .to_owned(),
            )
            .await?;

        // Index: genre (multi-select filter)
        manager
            .create_index(
                Index::create()
                    .name("idx_exhibition_genre")
                    .table(Exhibition::Table)
                    .col(Exhibition::Genre)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Exhibition::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Exhibition {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
    Genre,
    Latitude,
    Longitude,
    Area,
    Place,
    Address,
    Inquiry,
    Fee,
    Url,
    Thumbnail,
    IsDeleted,
    CreatedAt,
    UpdatedAt,
}
