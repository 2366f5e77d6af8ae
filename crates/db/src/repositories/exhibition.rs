//! Exhibition repository.
//!
//! Listing queries are flat projections built from one condition fragment:
//! the page query and the count query share the same WHERE clause and bind
//! values, so totals always match the content predicate.

use std::sync::Arc;

use crate::entities::{Exhibition, exhibition};
use crate::query::{ConditionSql, ExhibitionFilter, ExhibitionSortKey, Page, PageRequest, SortDirection};
use artlog_common::{AppError, AppResult};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, FromQueryResult,
    QueryFilter, Statement,
};

/// Flattened exhibition listing row.
#[derive(Debug, Clone, PartialEq, FromQueryResult, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionRow {
    /// Exhibition ID.
    pub exhibition_id: String,
    /// Exhibition name.
    pub name: String,
    /// Thumbnail URL.
    pub thumbnail: String,
    /// Opening date.
    pub start_date: NaiveDate,
    /// Closing date.
    pub end_date: NaiveDate,
    /// Venue latitude.
    pub latitude: f64,
    /// Venue longitude.
    pub longitude: f64,
    /// Total like rows.
    pub like_count: i64,
    /// Public, non-deleted reviews.
    pub review_count: i64,
    /// Whether the viewer liked this exhibition.
    pub is_liked: bool,
}

/// Around-me listing row: an [`ExhibitionRow`] plus distance in km.
#[derive(Debug, Clone, PartialEq, FromQueryResult, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionAroundRow {
    /// Exhibition ID.
    pub exhibition_id: String,
    /// Exhibition name.
    pub name: String,
    /// Thumbnail URL.
    pub thumbnail: String,
    /// Opening date.
    pub start_date: NaiveDate,
    /// Closing date.
    pub end_date: NaiveDate,
    /// Venue latitude.
    pub latitude: f64,
    /// Venue longitude.
    pub longitude: f64,
    /// Total like rows.
    pub like_count: i64,
    /// Public, non-deleted reviews.
    pub review_count: i64,
    /// Whether the viewer liked this exhibition.
    pub is_liked: bool,
    /// Great-circle distance from the caller in km.
    pub distance: f64,
}

#[derive(Debug, FromQueryResult)]
struct CountRow {
    count: i64,
}

/// Select list shared by the projection queries; aggregates are correlated
/// subqueries so no GROUP BY is needed and row identity stays one-per-row.
const PROJECTION_COLUMNS: &str = "\
    e.id AS exhibition_id, e.name, e.thumbnail, e.start_date, e.end_date, \
    e.latitude, e.longitude, \
    (SELECT COUNT(*) FROM exhibition_like el WHERE el.exhibition_id = e.id) AS like_count, \
    (SELECT COUNT(*) FROM review r WHERE r.exhibition_id = e.id \
        AND r.is_deleted = FALSE AND r.is_public = TRUE) AS review_count";

/// Exhibition repository for database operations.
#[derive(Clone)]
pub struct ExhibitionRepository {
    db: Arc<DatabaseConnection>,
}

impl ExhibitionRepository {
    /// Create a new exhibition repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an exhibition by ID. Soft-deleted exhibitions are excluded.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<exhibition::Model>> {
        Exhibition::find_by_id(id)
            .filter(exhibition::Column::IsDeleted.eq(false))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find an exhibition by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<exhibition::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ExhibitionNotFound(id.to_string()))
    }

    /// Create a new exhibition.
    pub async fn create(&self, model: exhibition::ActiveModel) -> AppResult<exhibition::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update an exhibition.
    pub async fn update(&self, model: exhibition::ActiveModel) -> AppResult<exhibition::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Filtered, paged exhibition listing.
    ///
    /// `viewer_id` is the sentinel for anonymous viewers; the liked-by EXISTS
    /// then matches nothing and every row reports `is_liked = false`.
    pub async fn find_page(
        &self,
        filter: &ExhibitionFilter,
        viewer_id: &str,
        sort: ExhibitionSortKey,
        direction: SortDirection,
        page: PageRequest,
        today: NaiveDate,
    ) -> AppResult<Page<ExhibitionRow>> {
        let cond = filter.to_condition_sql(today)?;
        let total = self.count(&cond).await?;

        let viewer_ph = cond.len() + 1;
        let limit_ph = cond.len() + 2;
        let offset_ph = cond.len() + 3;

        let sql = format!(
            "SELECT {PROJECTION_COLUMNS}, \
             EXISTS (SELECT 1 FROM exhibition_like vl \
                 WHERE vl.exhibition_id = e.id AND vl.user_id = ${viewer_ph}) AS is_liked \
             FROM exhibition e \
             WHERE {} \
             ORDER BY {} {}, e.id DESC \
             LIMIT ${limit_ph} OFFSET ${offset_ph}",
            cond.clause,
            sort.order_expr(),
            direction.as_sql(),
        );

        let mut values = cond.values;
        values.push(viewer_id.into());
        values.push(i64::try_from(page.limit()).unwrap_or(i64::MAX).into());
        values.push(i64::try_from(page.offset()).unwrap_or(i64::MAX).into());

        let rows = ExhibitionRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            values,
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Page::new(rows, page, total))
    }

    /// Count query over the same condition fragment as [`Self::find_page`].
    async fn count(&self, cond: &ConditionSql) -> AppResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) AS count FROM exhibition e WHERE {}",
            cond.clause
        );

        let row = CountRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            cond.values.clone(),
        ))
        .one(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(row.map_or(0, |r| u64::try_from(r.count).unwrap_or(0)))
    }

    /// Exhibitions within `distance_km` of (lat, lng), still running as of
    /// `today`, nearest first.
    ///
    /// Distance is the spherical law of cosines over the stored coordinates;
    /// 6371 is the Earth radius in km.
    pub async fn find_around(
        &self,
        latitude: f64,
        longitude: f64,
        distance_km: f64,
        viewer_id: &str,
        limit: u64,
        today: NaiveDate,
    ) -> AppResult<Vec<ExhibitionAroundRow>> {
        let sql = format!(
            "SELECT {PROJECTION_COLUMNS}, \
             EXISTS (SELECT 1 FROM exhibition_like vl \
                 WHERE vl.exhibition_id = e.id AND vl.user_id = $1) AS is_liked, \
             (6371 * acos(LEAST(1.0, \
                 cos(radians($2)) * cos(radians(e.latitude)) \
                 * cos(radians(e.longitude) - radians($3)) \
                 + sin(radians($2)) * sin(radians(e.latitude))))) AS distance \
             FROM exhibition e \
             WHERE e.is_deleted = FALSE \
               AND e.end_date >= $4 \
               AND (6371 * acos(LEAST(1.0, \
                 cos(radians($2)) * cos(radians(e.latitude)) \
                 * cos(radians(e.longitude) - radians($3)) \
                 + sin(radians($2)) * sin(radians(e.latitude))))) <= $5 \
             ORDER BY distance ASC, e.id DESC \
             LIMIT $6"
        );

        ExhibitionAroundRow::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [
                viewer_id.into(),
                latitude.into(),
                longitude.into(),
                today.into(),
                distance_km.into(),
                i64::try_from(limit).unwrap_or(i64::MAX).into(),
            ],
        ))
        .all(self.db.as_ref())
        .await
        .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::exhibition::{Area, Genre};
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_exhibition(id: &str, name: &str) -> exhibition::Model {
        exhibition::Model {
            id: id.to_string(),
            name: name.to_string(),
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

    #[tokio::test]
    async fn test_find_by_id_found() {
        let exhibition = create_test_exhibition("ex1", "Light and Shadow");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[exhibition]])
                .into_connection(),
        );

        let repo = ExhibitionRepository::new(db);
        let found = repo.find_by_id("ex1").await.unwrap().unwrap();
        assert_eq!(found.name, "Light and Shadow");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found_returns_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<exhibition::Model>::new()])
                .into_connection(),
        );

        let repo = ExhibitionRepository::new(db);
        let result = repo.get_by_id("ghost").await;

        match result {
            Err(AppError::ExhibitionNotFound(id)) => assert_eq!(id, "ghost"),
            other => panic!("Expected ExhibitionNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_find_page_count_and_content_share_predicate() {
        // Projection rows are FromQueryResult-only, so mocks feed them as
        // raw column maps keyed by the SELECT aliases.
        let mut row = std::collections::BTreeMap::<String, sea_orm::Value>::new();
        row.insert("exhibition_id".to_string(), "ex1".into());
        row.insert("name".to_string(), "Light and Shadow".into());
        row.insert(
            "thumbnail".to_string(),
            "https://example.com/light.jpg".into(),
        );
        row.insert(
            "start_date".to_string(),
            NaiveDate::from_ymd_opt(2026, 8, 1).unwrap().into(),
        );
        row.insert(
            "end_date".to_string(),
            NaiveDate::from_ymd_opt(2026, 9, 30).unwrap().into(),
        );
        row.insert("latitude".to_string(), 37.5665.into());
        row.insert("longitude".to_string(), 126.978.into());
        row.insert("like_count".to_string(), 3i64.into());
        row.insert("review_count".to_string(), 1i64.into());
        row.insert("is_liked".to_string(), false.into());

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([vec![count_row(1)]])
                .append_query_results([vec![row]])
                .into_connection(),
        );

        let repo = ExhibitionRepository::new(db);
        let filter = ExhibitionFilter {
            include_end: true,
            ..Default::default()
        };
        let page = repo
            .find_page(
                &filter,
                artlog_common::ANONYMOUS_VIEWER,
                ExhibitionSortKey::CreatedAt,
                SortDirection::Desc,
                PageRequest::new(0, 20),
                NaiveDate::from_ymd_opt(2026, 8, 15).unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(page.total_elements, 1);
        assert_eq!(page.content.len(), 1);
        assert!(!page.content[0].is_liked);
    }

    // The count query runs before the page query, so its mock result is
    // appended first.
    fn count_row(count: i64) -> std::collections::BTreeMap<String, sea_orm::Value> {
        let mut map = std::collections::BTreeMap::new();
        map.insert("count".to_string(), count.into());
        map
    }
}
