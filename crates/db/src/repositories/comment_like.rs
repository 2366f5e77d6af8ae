use std::sync::Arc;

use crate::entities::{CommentLike, comment_like};
use artlog_common::{AppError, AppResult, error::codes};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, PaginatorTrait,
    QueryFilter, SqlErr,
};

/// Comment like repository for database operations.
#[derive(Clone)]
pub struct CommentLikeRepository {
    db: Arc<DatabaseConnection>,
}

impl CommentLikeRepository {
    /// Create a new comment like repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a like by user and comment.
    pub async fn find_by_user_and_comment(
        &self,
        user_id: &str,
        comment_id: &str,
    ) -> AppResult<Option<comment_like::Model>> {
        CommentLike::find()
            .filter(comment_like::Column::UserId.eq(user_id))
            .filter(comment_like::Column::CommentId.eq(comment_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a like row. Concurrent double likes trip the unique
    /// (user_id, comment_id) index and surface as a duplicate-like conflict.
    pub async fn create(&self, model: comment_like::ActiveModel) -> AppResult<comment_like::Model> {
        model.insert(self.db.as_ref()).await.map_err(|e| {
            if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) {
                AppError::already_exists(codes::DUPLICATE_LIKE, "Comment is already liked")
            } else {
                AppError::Database(e.to_string())
            }
        })
    }

    /// Delete a like row.
    pub async fn delete(&self, model: comment_like::Model) -> AppResult<()> {
        model
            .delete(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Count likes for a comment.
    pub async fn count_by_comment(&self, comment_id: &str) -> AppResult<u64> {
        CommentLike::find()
            .filter(comment_like::Column::CommentId.eq(comment_id))
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

    fn create_test_like(id: &str, user_id: &str, comment_id: &str) -> comment_like::Model {
        comment_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            comment_id: comment_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user_and_comment() {
        let like = create_test_like("like1", "user1", "com1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[like]])
                .into_connection(),
        );

        let repo = CommentLikeRepository::new(db);
        let found = repo
            .find_by_user_and_comment("user1", "com1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.comment_id, "com1");
    }

    #[tokio::test]
    async fn test_delete_like() {
        let like = create_test_like("like1", "user1", "com1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = CommentLikeRepository::new(db);
        assert!(repo.delete(like).await.is_ok());
    }
}
