//! Exhibition service.

use artlog_common::{error::codes, AppError, AppResult, IdGenerator};
use artlog_db::{
    entities::{exhibition, exhibition_like},
    query::{ExhibitionFilter, ExhibitionSortKey, Page, PageRequest, SortDirection},
    repositories::{
        ExhibitionAroundRow, ExhibitionLikeRepository, ExhibitionRepository, ExhibitionRow,
        ReviewRepository,
    },
};
use chrono::NaiveDate;
use sea_orm::Set;
use serde::Serialize;
use tracing::info;

use crate::domain::ExhibitionDraft;

const AROUND_LIMIT: u64 = 100;
const DISTANCE_MAX_KM: f64 = 100.0;

/// Result of a like toggle: the new state plus the authoritative count,
/// re-read after the write.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeStatus {
    /// Whether the viewer now likes the target.
    pub is_liked: bool,
    /// Total likes after the toggle.
    pub like_count: u64,
}

/// Exhibition detail: every stored field plus aggregates for the viewer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionDetail {
    /// Exhibition ID.
    pub exhibition_id: String,
    /// Exhibition name.
    pub name: String,
    /// Opening date.
    pub start_date: chrono::NaiveDate,
    /// Closing date.
    pub end_date: chrono::NaiveDate,
    /// Genre.
    pub genre: exhibition::Genre,
    /// Venue latitude.
    pub latitude: f64,
    /// Venue longitude.
    pub longitude: f64,
    /// Area.
    pub area: exhibition::Area,
    /// Venue name.
    pub place: String,
    /// Venue address.
    pub address: String,
    /// Contact.
    pub inquiry: String,
    /// Admission fee description.
    pub fee: String,
    /// Official page.
    pub url: String,
    /// Thumbnail image.
    pub thumbnail: String,
    /// Total likes.
    pub like_count: u64,
    /// Public, non-deleted reviews.
    pub review_count: u64,
    /// Whether the viewer liked it.
    pub is_liked: bool,
}

/// Exhibition service for browsing, filtering and likes.
#[derive(Clone)]
pub struct ExhibitionService {
    exhibition_repo: ExhibitionRepository,
    like_repo: ExhibitionLikeRepository,
    review_repo: ReviewRepository,
    id_gen: IdGenerator,
}

impl ExhibitionService {
    /// Create a new exhibition service.
    #[must_use]
    pub const fn new(
        exhibition_repo: ExhibitionRepository,
        like_repo: ExhibitionLikeRepository,
        review_repo: ReviewRepository,
    ) -> Self {
        Self {
            exhibition_repo,
            like_repo,
            review_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register an exhibition.
    pub async fn create(&self, draft: ExhibitionDraft) -> AppResult<exhibition::Model> {
        let id = self.id_gen.generate();
        let model = self
            .exhibition_repo
            .create(exhibition::ActiveModel {
                id: Set(id),
                name: Set(draft.name),
                start_date: Set(draft.start_date),
                end_date: Set(draft.end_date),
                genre: Set(draft.genre),
                latitude: Set(draft.latitude),
                longitude: Set(draft.longitude),
                area: Set(draft.area),
                place: Set(draft.place),
                address: Set(draft.address),
                inquiry: Set(draft.inquiry),
                fee: Set(draft.fee),
                url: Set(draft.url),
                thumbnail: Set(draft.thumbnail),
                is_deleted: Set(false),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            })
            .await?;

        info!(exhibition_id = %model.id, "Exhibition created");
        Ok(model)
    }

    /// Replace an exhibition's fields with a new validated draft.
    pub async fn update(&self, id: &str, draft: ExhibitionDraft) -> AppResult<exhibition::Model> {
        self.exhibition_repo.get_by_id(id).await?;

        self.exhibition_repo
            .update(exhibition::ActiveModel {
                id: Set(id.to_string()),
                name: Set(draft.name),
                start_date: Set(draft.start_date),
                end_date: Set(draft.end_date),
                genre: Set(draft.genre),
                latitude: Set(draft.latitude),
                longitude: Set(draft.longitude),
                area: Set(draft.area),
                place: Set(draft.place),
                address: Set(draft.address),
                inquiry: Set(draft.inquiry),
                fee: Set(draft.fee),
                url: Set(draft.url),
                thumbnail: Set(draft.thumbnail),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await
    }

    /// Soft-delete an exhibition. Its reviews stay reachable by direct link.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.exhibition_repo.get_by_id(id).await?;

        self.exhibition_repo
            .update(exhibition::ActiveModel {
                id: Set(id.to_string()),
                is_deleted: Set(true),
                updated_at: Set(Some(chrono::Utc::now().into())),
                ..Default::default()
            })
            .await?;

        info!(exhibition_id = %id, "Exhibition deleted");
        Ok(())
    }

    /// Exhibition detail for a viewer.
    pub async fn get_detail(&self, id: &str, viewer_id: &str) -> AppResult<ExhibitionDetail> {
        let exhibition = self.exhibition_repo.get_by_id(id).await?;
        let like_count = self.like_repo.count_by_exhibition(id).await?;
        let review_count = self
            .review_repo
            .count_public_for_exhibition(id)
            .await?;
        let is_liked = self
            .like_repo
            .find_by_user_and_exhibition(viewer_id, id)
            .await?
            .is_some();

        Ok(ExhibitionDetail {
            exhibition_id: exhibition.id,
            name: exhibition.name,
            start_date: exhibition.start_date,
            end_date: exhibition.end_date,
            genre: exhibition.genre,
            latitude: exhibition.latitude,
            longitude: exhibition.longitude,
            area: exhibition.area,
            place: exhibition.place,
            address: exhibition.address,
            inquiry: exhibition.inquiry,
            fee: exhibition.fee,
            url: exhibition.url,
            thumbnail: exhibition.thumbnail,
            like_count,
            review_count,
            is_liked,
        })
    }

    /// Filtered, paged listing.
    pub async fn list(
        &self,
        filter: &ExhibitionFilter,
        viewer_id: &str,
        sort: ExhibitionSortKey,
        direction: SortDirection,
        page: PageRequest,
        today: NaiveDate,
    ) -> AppResult<Page<ExhibitionRow>> {
        self.exhibition_repo
            .find_page(filter, viewer_id, sort, direction, page, today)
            .await
    }

    /// Running exhibitions within `distance_km` of the caller, nearest first.
    pub async fn around(
        &self,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
        viewer_id: &str,
        today: NaiveDate,
    ) -> AppResult<Vec<ExhibitionAroundRow>> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(AppError::invalid(
                codes::INVALID_EXHIBITION_COORDINATE,
                "coordinate out of range",
            ));
        }
        if !(distance_km > 0.0 && distance_km <= DISTANCE_MAX_KM) {
            return Err(AppError::invalid(
                codes::INVALID_DISTANCE,
                "distance must be between 0 and 100 km",
            ));
        }

        self.exhibition_repo
            .find_around(latitude, longitude, distance_km, viewer_id, AROUND_LIMIT, today)
            .await
    }

    /// Toggle the viewer's like. Present removes, absent inserts; the count
    /// is re-read afterwards so the response never drifts from storage.
    pub async fn toggle_like(&self, user_id: &str, exhibition_id: &str) -> AppResult<LikeStatus> {
        self.exhibition_repo.get_by_id(exhibition_id).await?;

        let is_liked = match self
            .like_repo
            .find_by_user_and_exhibition(user_id, exhibition_id)
            .await?
        {
            Some(like) => {
                self.like_repo.delete(like).await?;
                false
            }
            None => {
                self.like_repo
                    .create(exhibition_like::ActiveModel {
                        id: Set(self.id_gen.generate()),
                        user_id: Set(user_id.to_string()),
                        exhibition_id: Set(exhibition_id.to_string()),
                        created_at: Set(chrono::Utc::now().into()),
                    })
                    .await?;
                true
            }
        };

        let like_count = self.like_repo.count_by_exhibition(exhibition_id).await?;
        Ok(LikeStatus {
            is_liked,
            like_count,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use artlog_db::entities::exhibition::{Area, Genre};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_exhibition(id: &str) -> exhibition::Model {
        exhibition::Model {
            id: id.to_string(),
            name: "Light and Shadow".to_string(),
            start_date: NaiveDate::from_ymd_opt(2026, 8, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 30).unwrap(),
            genre: Genre::Painting,
            latitude: 37.5665,
            longitude: 126.978,
            area: Area::Seoul,
            place: "City Gallery".to_string(),
            address: "1 Sejong-daero".to_string(),
            inquiry: "02-000-0000".to_string(),
            fee: "Free".to_string(),
            url: "https://example.com/light".to_string(),
            thumbnail: "https://example.com/light.jpg".to_string(),
            is_deleted: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_like(id: &str, user_id: &str, exhibition_id: &str) -> exhibition_like::Model {
        exhibition_like::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            exhibition_id: exhibition_id.to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn count_row(key: &str, count: i64) -> std::collections::BTreeMap<String, sea_orm::Value> {
        let mut map = std::collections::BTreeMap::new();
        map.insert(key.to_string(), count.into());
        map
    }

    fn service(
        exhibition_db: MockDatabase,
        like_db: MockDatabase,
        review_db: MockDatabase,
    ) -> ExhibitionService {
        ExhibitionService::new(
            ExhibitionRepository::new(Arc::new(exhibition_db.into_connection())),
            ExhibitionLikeRepository::new(Arc::new(like_db.into_connection())),
            ReviewRepository::new(Arc::new(review_db.into_connection())),
        )
    }

    #[tokio::test]
    async fn test_toggle_like_removes_existing() {
        let exhibition = create_test_exhibition("ex1");
        let like = create_test_like("like1", "user1", "ex1");

        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[exhibition]]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[like]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([[count_row("num_items", 0)]]);
        let review_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(exhibition_db, like_db, review_db);
        let status = svc.toggle_like("user1", "ex1").await.unwrap();

        assert!(!status.is_liked);
        assert_eq!(status.like_count, 0);
    }

    #[tokio::test]
    async fn test_toggle_like_missing_exhibition() {
        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<exhibition::Model>::new()]);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(exhibition_db, like_db, review_db);
        let result = svc.toggle_like("user1", "ghost").await;
        assert!(matches!(result, Err(AppError::ExhibitionNotFound(_))));
    }

    #[tokio::test]
    async fn test_around_rejects_bad_distance() {
        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(exhibition_db, like_db, review_db);
        let today = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();

        let result = svc.around(37.5, 127.0, 0.0, "-", today).await;
        match result {
            Err(AppError::Invalid { code, .. }) => assert_eq!(code, codes::INVALID_DISTANCE),
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_around_rejects_bad_coordinate() {
        let exhibition_db = MockDatabase::new(DatabaseBackend::Postgres);
        let like_db = MockDatabase::new(DatabaseBackend::Postgres);
        let review_db = MockDatabase::new(DatabaseBackend::Postgres);

        let svc = service(exhibition_db, like_db, review_db);
        let today = NaiveDate::from_ymd_opt(2026, 8, 15).unwrap();

        let result = svc.around(95.0, 127.0, 5.0, "-", today).await;
        match result {
            Err(AppError::Invalid { code, .. }) => {
                assert_eq!(code, codes::INVALID_EXHIBITION_COORDINATE);
            }
            other => panic!("Expected Invalid, got {other:?}"),
        }
    }
}
