//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_user_table;
mod m20260101_000002_create_role_tables;
mod m20260101_000003_create_exhibition_table;
mod m20260101_000004_create_exhibition_like_table;
mod m20260101_000005_create_review_table;
mod m20260101_000006_create_review_photo_table;
mod m20260101_000007_create_review_like_table;
mod m20260101_000008_create_comment_table;
mod m20260101_000009_create_comment_like_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_user_table::Migration),
            Box::new(m20260101_000002_create_role_tables::Migration),
            Box::new(m20260101_000003_create_exhibition_table::Migration),
            Box::new(m20260101_000004_create_exhibition_like_table::Migration),
            Box::new(m20260101_000005_create_review_table::Migration),
            Box::new(m20260101_000006_create_review_photo_table::Migration),
            Box::new(m20260101_000007_create_review_like_table::Migration),
            Box::new(m20260101_000008_create_comment_table::Migration),
            Box::new(m20260101_000009_create_comment_like_table::Migration),
        ]
    }
}
