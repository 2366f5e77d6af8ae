//! Review repository.
//!
//! The listing joins the author and projects aggregate counts in one pass.
//! Visibility is part of the WHERE fragment, so private reviews of other
//! users never reach application code, and the count query reuses the exact
//! same fragment.

use std::collections::HashMap;
use std::sync::Arc;

use crate::entities::{Review, ReviewPhoto, review, review_photo};
use crate::query::{Page, PageRequest, ReviewSortKey, SortDirection};
use artlog_common::{AppError, AppResult};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, Statement,
};

/// Flattened review listing row: review fields plus author identity and
/// aggregate counts.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ReviewRow {
    /// Review ID.
    pub review_id: String,
    /// Review title.
    pub title: String,
    /// Review body.
    pub content: String,
    /// Visit date.
    pub date: NaiveDate,
    /// Whether the review is public.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    /// Last edit timestamp, if any.
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Author user ID.
    pub author_id: String,
    /// Author nickname.
    pub author_nickname: String,
    /// Author profile image URL, if set.
    pub author_profile_image: Option<String>,
    /// Total like rows.
    pub like_count: i64,
    /// Non-deleted comments, children included.
    pub comment_count: i64,
    /// Whether the viewer liked this review.
    pub is_liked: bool,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

const PROJECTION_COLUMNS: &str = "\
    r.id AS review_id, r.title, r.content, r.date, r.is_public, \
    r.created_at, r.updated_at, \
    u.id AS author_id, u.nickname AS author_nickname, \
    u.profile_image AS author_profile_image, \
    (SELECT COUNT(*) FROM review_like rl WHERE rl.review_id = r.id) AS like_count, \
    (SELECT COUNT(*) FROM comment c WHERE c.review_id = r.id \
        AND c.is_deleted = FALSE) AS comment_count";

/// Only the author sees their private reviews; the anonymous sentinel never
/// matches a user_id so anonymous viewers get public rows only.
const VISIBILITY_CLAUSE: &str =
    "r.exhibition_id = $1 AND r.is_deleted = FALSE AND (r.is_public = TRUE OR r.user_id = $2)";

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID. Soft-deleted reviews are excluded.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .filter(review::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<review::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReviewNotFound(id.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Paged review listing for an exhibition, visible to `viewer_id`.
    pub async fn find_page_for_exhibition(
        &self,
        exhibition_id: &str,
        viewer_id: &str,
        sort: ReviewSortKey,
        direction: SortDirection,
        page: PageRequest,
    ) -> AppResult<Page<ReviewRow>> {
        let total = self.count_for_exhibition(exhibition_id, viewer_id).await?;

        let sql = format!(
            "SELECT {PROJECTION_COLUMNS}, \
             EXISTS (SELECT 1 FROM review_like vl \
                 WHERE vl.review_id = r.id AND vl.user_id = $2) AS is_liked \
             FROM review r \
             JOIN \"user\" u ON u.id = r.user_id \
             WHERE {VISIBILITY_CLAUSE} \
             ORDER BY {} {}, r.id DESC \
             LIMIT $3 OFFSET $4",
            sort.order_expr(),
            direction.as_sql(),
        );

        let rows = ReviewRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                exhibition_id.into(),
                viewer_id.into(),
                i64::try_from(page.limit()).unwrap_or(i64::MAX).into(),
                i64::try_from(page.offset()).unwrap_or(i64::MAX).into(),
            ],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Page::new(rows, page, total))
    }

    /// Public, non-deleted reviews of an exhibition. Feeds the exhibition
    /// detail aggregate.
    pub async fn count_public_for_exhibition(&self, exhibition_id: &str) -> AppResult<u64> {
        self.count_for_exhibition(exhibition_id, artlog_common::ANONYMOUS_VIEWER)
            .await
    }

    async fn count_for_exhibition(&self, exhibition_id: &str, viewer_id: &str) -> AppResult<u64> {
        let sql = format!("SELECT COUNT(*) AS count FROM review r WHERE {VISIBILITY_CLAUSE}");

        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [exhibition_id.into(), viewer_id.into()],
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0, |r| u64::try_from(r.count).unwrap_or(0)))
    }

    /// Single review projection, same row shape as the listing.
    pub async fn find_row_by_id(
        &self,
        review_id: &str,
        viewer_id: &str,
    ) -> AppResult<Option<ReviewRow>> {
        let sql = format!(
            "SELECT {PROJECTION_COLUMNS}, \
             EXISTS (SELECT 1 FROM review_like vl \
                 WHERE vl.review_id = r.id AND vl.user_id = $2) AS is_liked \
             FROM review r \
             JOIN \"user\" u ON u.id = r.user_id \
             WHERE r.id = $1 AND r.is_deleted = FALSE"
        );

        ReviewRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [review_id.into(), viewer_id.into()],
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Photos for a set of reviews, grouped by review ID in display order.
    pub async fn find_photos_for(
        &self,
        review_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<review_photo::Model>>> {
        if review_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let photos = ReviewPhoto::find()
            .filter(review_photo::Column::ReviewId.is_in(review_ids.iter().map(String::as_str)))
            .order_by_asc(review_photo::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut grouped: HashMap<String, Vec<review_photo::Model>> = HashMap::new();
        for photo in photos {
            grouped.entry(photo.review_id.clone()).or_default().push(photo);
        }
        Ok(grouped)
    }

    /// Replace all photos of a review with the given paths.
    pub async fn replace_photos(
        &self,
        models: Vec<review_photo::ActiveModel>,
        review_id: &str,
    ) -> AppResult<()> {
        ReviewPhoto::delete_many()
            .filter(review_photo::Column::ReviewId.eq(review_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if !models.is_empty() {
            ReviewPhoto::insert_many(models)
                .exec(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_review(id: &str, user_id: &str) -> review::Model {
        review::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            exhibition_id: "ex1".to_string(),
            title: "Worth a second visit".to_string(),
            content: "The final room alone justifies the ticket.".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            is_public: true,
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let review = create_test_review("rev1", "user1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let found = repo.find_by_id("rev1").await.unwrap().unwrap();
        assert_eq!(found.title, "Worth a second visit");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        match result {
            Err(AppError::ReviewNotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("Expected ReviewNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_photos_for_empty_ids_skips_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let repo = ReviewRepository::new(db);
        let grouped = repo.find_photos_for(&[]).await.unwrap();
        assert!(grouped.is_empty());
    }

    #[tokio::test]
    async fn test_find_photos_for_groups_by_review() {
        let photos = vec![
            review_photo::Model {
                id: "ph1".to_string(),
                review_id: "rev1".to_string(),
                path: "https://cdn.example.com/a.jpg".to_string(),
            },
            review_photo::Model {
                id: "ph2".to_string(),
                review_id: "rev1".to_string(),
                path: "https://cdn.example.com/b.jpg".to_string(),
            },
            review_photo::Model {
                id: "ph3".to_string(),
                review_id: "rev2".to_string(),
                path: "https://cdn.example.com/c.jpg".to_string(),
            },
        ];

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([photos])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let grouped = repo
            .find_photos_for(&["rev1".to_string(), "rev2".to_string()])
            .await
            .unwrap();

        assert_eq!(grouped["rev1"].len(), 2);
        assert_eq!(grouped["rev2"].len(), 1);
    }
}
