//! Review service.

use artlog_common::{AppError, AppResult, IdGenerator};
use artlog_db::{
    entities::{review, review_like, review_photo},
    query::{Page, PageRequest, ReviewSortKey, SortDirection},
    repositories::{
        ExhibitionRepository, ReviewLikeRepository, ReviewRepository, ReviewRow,
    },
};
use sea_orm::Set;
use serde::Serialize;
use tracing::info;

use crate::domain::ReviewDraft;
use crate::services::exhibition::LikeStatus;

/// Review author identity.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    /// Author user ID.
    pub id: String,
    /// Author nickname.
    pub nickname: String,
    /// Author profile image URL, if set.
    pub profile_image: Option<String>,
}

/// A review as rendered to clients: the flat row plus its photos.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewView {
    /// Review ID.
    pub review_id: String,
    /// Review title.
    pub title: String,
    /// Review body.
    pub content: String,
    /// Visit date.
    pub date: chrono::NaiveDate,
    /// Whether the review is public.
    pub is_public: bool,
    /// Creation timestamp.
    pub created_at: chrono::DateTime<chrono::FixedOffset>,
    /// Last edit timestamp, if any.
    pub updated_at: Option<chrono::DateTime<chrono::FixedOffset>>,
    /// Author identity.
    pub author: AuthorView,
    /// Total likes.
    pub like_count: i64,
    /// Non-deleted comments, children included.
    pub comment_count: i64,
    /// Whether the viewer liked it.
    pub is_liked: bool,
    /// Photo URLs in display order.
    pub photos: Vec<String>,
}

impl ReviewView {
    fn from_row(row: ReviewRow, photos: Vec<String>) -> Self {
        Self {
            review_id: row.review_id,
            title: row.title,
            content: row.content,
            date: row.date,
            is_public: row.is_public,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: AuthorView {
                id: row.author_id,
                nickname: row.author_nickname,
                profile_image: row.author_profile_image,
            },
            like_count: row.like_count,
            comment_count: row.comment_count,
            is_liked: row.is_liked,
            photos,
        }
    }
}

/// Review service for authoring, listing and likes.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    like_repo: ReviewLikeRepository,
    exhibition_repo: ExhibitionRepository,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        review_repo: ReviewRepository,
        like_repo: ReviewLikeRepository,
        exhibition_repo: ExhibitionRepository,
    ) -> Self {
        Self {
            review_repo,
            like_repo,
            exhibition_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Write a review for an exhibition.
    pub async fn create(
        &self,
        user_id: &str,
        exhibition_id: &str,
        draft: ReviewDraft,
    ) -> AppResult<review::Model> {
        self.exhibition_repo.get_by_id(exhibition_id).await?;

        let review_id = self.id_gen.generate();
        let model = self
            .review_repo
            .create(review::ActiveModel {
                id: Set(review_id.clone()),
                user_id: Set(user_id.to_string()),
                exhibition_id: Set(exhibition_id.to_string()),
                title: Set(draft.title),
                content: Set(draft.content),
                date: Set(draft.date),
                is_public: Set(draft.is_public),
                is_deleted: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        let photos = self.photo_models(&review_id, &draft.photos);
        self.review_repo.replace_photos(photos, &review_id).await?;

        info!(review_id = %model.id, exhibition_id, "Review created");
        Ok(model)
    }

    /// Rewrite a review. Only the author may.
    pub async fn update(
        &self,
        user_id: &str,
        review_id: &str,
        draft: ReviewDraft,
    ) -> AppResult<review::Model> {
        let existing = self.review_repo.get_by_id(review_id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("Not the review author".to_string()));
        }

        let model = self
            .review_repo
            .update(review::ActiveModel {
                id: Set(review_id.to_string()),
                title: Set(draft.title),
                content: Set(draft.content),
                date: Set(draft.date),
                is_public: Set(draft.is_public),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await?;

        let photos = self.photo_models(review_id, &draft.photos);
        self.review_repo.replace_photos(photos, review_id).await?;

        Ok(model)
    }

    /// Soft-delete a review. Only the author may.
    pub async fn delete(&self, user_id: &str, review_id: &str) -> AppResult<()> {
        let existing = self.review_repo.get_by_id(review_id).await?;
        if existing.user_id != user_id {
            return Err(AppError::Forbidden("Not the review author".to_string()));
        }

        self.review_repo
            .update(review::ActiveModel {
                id: Set(review_id.to_string()),
                is_deleted: Set(true),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await?;

        info!(review_id, "Review deleted");
        Ok(())
    }

    /// Review detail for a viewer. A private review is visible only to its
    /// author and answers not-found to anyone else.
    pub async fn get_detail(&self, review_id: &str, viewer_id: &str) -> AppResult<ReviewView> {
        let row = self
            .review_repo
            .find_row_by_id(review_id, viewer_id)
            .await?
            .ok_or_else(|| AppError::ReviewNotFound(review_id.to_string()))?;

        if !row.is_public && row.author_id != viewer_id {
            return Err(AppError::ReviewNotFound(review_id.to_string()));
        }

        let mut photos = self
            .review_repo
            .find_photos_for(std::slice::from_ref(&row.review_id))
            .await?;
        let paths = photos
            .remove(&row.review_id)
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.path)
            .collect();

        Ok(ReviewView::from_row(row, paths))
    }

    /// Paged reviews of an exhibition visible to the viewer, photos attached
    /// by one bulk query.
    pub async fn list_for_exhibition(
        &self,
        exhibition_id: &str,
        viewer_id: &str,
        sort: ReviewSortKey,
        direction: SortDirection,
        page: PageRequest,
    ) -> AppResult<Page<ReviewView>> {
        self.exhibition_repo.get_by_id(exhibition_id).await?;

        let rows = self
            .review_repo
            .find_page_for_exhibition(exhibition_id, viewer_id, sort, direction, page)
            .await?;

        let ids: Vec<String> = rows.content.iter().map(|r| r.review_id.clone()).collect();
        let mut photos = self.review_repo.find_photos_for(&ids).await?;

        Ok(rows.map(|row| {
            let paths = photos
                .remove(&row.review_id)
                .unwrap_or_default()
                .into_iter()
                .map(|p| p.path)
                .collect();
            ReviewView::from_row(row, paths)
        }))
    }

    /// Toggle the viewer's like and re-read the count.
    pub async fn toggle_like(&self, user_id: &str, review_id: &str) -> AppResult<LikeStatus> {
        self.review_repo.get_by_id(review_id).await?;

        let is_liked = match self
            .like_repo
            .find_by_user_and_review(user_id, review_id)
            .await?
        {
            Some(like) => {
                self.like_repo.delete(like).await?;
                false
            }
            None => {
                self.like_repo
                    .create(review_like::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        user_id: Set(user_id.to_string()),
                        review_id: Set(review_id.to_string()),
                        created_at: Set(chrono::Utc::now().into()),
                    })
                    .await?;
                true
            }
        };

        let like_count = self.like_repo.count_by_review(review_id).await?;
        Ok(LikeStatus {
            is_liked,
            like_count,
        })
    }

    fn photo_models(&self, review_id: &str, paths: &[String]) -> Vec<review_photo::ActiveModel> {
        paths
            .iter()
            .map(|path| review_photo::ActiveModel {
                id: Set(self.id_gen.generate()),
                review_id: Set(review_id.to_string()),
                path: Set(path.clone()),
            })
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
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

    // Projection rows are FromQueryResult-only, so mocks feed them as raw
    // column maps keyed by the SELECT aliases.
    fn review_row(
        id: &str,
        author_id: &str,
        is_public: bool,
    ) -> std::collections::BTreeMap<String, sea_orm::Value> {
        let mut row = std::collections::BTreeMap::<String, sea_orm::Value>::new();
        row.insert("review_id".to_string(), id.into());
        row.insert("title".to_string(), "Worth a second visit".into());
        row.insert(
            "content".to_string(),
            "The final room alone justifies the ticket.".into(),
        );
        row.insert(
            "date".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap().into(),
        );
        row.insert("is_public".to_string(), is_public.into());
        row.insert("created_at".to_string(), Utc::now().fixed_offset().into());
        row.insert(
            "updated_at".to_string(),
            Option::<chrono::DateTime<chrono::FixedOffset>>::None.into(),
        );
        row.insert("author_id".to_string(), author_id.into());
        row.insert("author_nickname".to_string(), "artfan".into());
        row.insert(
            "author_profile_image".to_string(),
            Option::<String>::None.into(),
        );
        row.insert("like_count".to_string(), 2i64.into());
        row.insert("comment_count".to_string(), 4i64.into());
        row.insert("is_liked".to_string(), false.into());
        row
    }

    fn service(
        review_db: MockDatabase,
        like_db: MockDatabase,
        exhibition_db: MockDatabase,
    ) -> ReviewService {
        ReviewService::new(
            ReviewRepository::new(Arc::new(review_db.into_connection())),
            ReviewLikeRepository::new(Arc::new(like_db.into_connection())),
            ExhibitionRepository::new(Arc::new(exhibition_db.into_connection())),
        )
    }

    #[tokio::test]
    async fn test_update_by_non_author_forbidden() {
        let review = create_test_review("rev1", "author1");

        let review_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[review]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(review_db, like_db, exhibition_db);
        let draft = ReviewDraft::new(
            "New title".to_string(),
            "New content".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 10).unwrap(),
            true,
            vec![],
            NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
        )
        .unwrap();

        let result = svc.update("intruder", "rev1", draft).await;
        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_get_detail_private_hidden_from_stranger() {
        let row = review_row("rev1", "author1", false);

        let review_db =
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[row]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(review_db, like_db, exhibition_db);
        let result = svc.get_detail("rev1", "stranger").await;
        assert!(matches!(result, Err(AppError::ReviewNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_detail_private_visible_to_author() {
        let row = review_row("rev1", "author1", false);

        let review_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[row]])
            .append_query_results([Vec::<review_photo::Model>::new()]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(review_db, like_db, exhibition_db);
        let view = svc.get_detail("rev1", "author1").await.unwrap();
        assert_eq!(view.author.id, "author1");
        assert!(view.photos.is_empty());
    }
}
