use std::sync::Arc;

use crate::entities::{ExhibitionLike, exhibition_like};
use artlog_common::{AppError, AppResult, error::codes};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, SqlErr,
};

/// Exhibition like repository for database operations.
#[derive(Clone)]
pub struct ExhibitionLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ExhibitionLikeRepository {
    /// Create a new exhibition like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and exhibition.
    pub async fn find_by_user_and_exhibition(
        &self,
        user_id: &str,
        exhibition_id: &str,
    ) -> AppResult<Option<exhibition_like::Model>> {
        ExhibitionLike::find()
            .filter(exhibition_like::Column::UserId.eq(user_id))
            .filter(exhibition_like::Column::ExhibitionId.eq(exhibition_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a like row.
    ///
    /// The unique (user_id, exhibition_id) index makes concurrent double
    /// likes lose the race at the database, not in application code.
    pub async fn create(
        &self,
        model: exhibition_like::ActiveModel,
    ) -> AppResult<exhibition_like::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::already_exists(codes::DUPLICATE_LIKE, "Exhibition is already liked")
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete a like row.
    pub async fn delete(&self, model: exhibition_like::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes for an exhibition.
    pub async fn count_by_exhibition(&self, exhibition_id: &str) -> AppResult<u64> {
        ExhibitionLike::find()
            .filter(exhibition_like::Column::ExhibitionId.eq(exhibition_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
