use std::sync::Arc;

use crate::entities::{ReviewLike, review_like};
use artlog_common::{AppError, AppResult, error::codes};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, SqlErr,
};

/// Review like repository for database operations.
#[derive(Clone)]
pub struct ReviewLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewLikeRepository {
    /// Create a new review like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and review.
    pub async fn find_by_user_and_review(
        &self,
        user_id: &str,
        review_id: &str,
    ) -> AppResult<Option<review_like::Model>> {
        ReviewLike::find()
            .filter(review_like::Column::UserId.eq(user_id))
            .filter(review_like::Column::ReviewId.eq(review_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a like row. Concurrent double likes trip the unique
    /// (user_id, review_id) index and surface as a duplicate-like conflict.
    pub async fn create(&self, model: review_like::ActiveModel) -> AppResult<review_like::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::already_exists(codes::DUPLICATE_LIKE, "Review is already liked")
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete a like row.
    pub async fn delete(&self, model: review_like::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes for a review.
    pub async fn count_by_review(&self, review_id: &str) -> AppResult<u64> {
        ReviewLike::find()
            .filter(review_like::Column::ReviewId.eq(review_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_like(id: &str, user_id: &str, review_id: &str) -> review_like::Model {
        review_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            review_id: review_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_review() {
        let like = create_test_like("like1", "user1", "rev1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = ReviewLikeRepository::new(db);
        let found = repo
            .find_by_user_and_review("user1", "rev1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.review_id, "rev1");
    }

    #[tokio::test]
    async fn test_delete_like() {
        let like = create_test_like("like1", "user1", "rev1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = ReviewLikeRepository::new(db);
        assert!(repo.delete(like).await.is_ok());
    }
}
