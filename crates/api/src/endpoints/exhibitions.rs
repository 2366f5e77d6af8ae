//! Exhibition endpoints.

use artlog_common::{error::codes, AppError, AppResult};
use artlog_core::domain::{ExhibitionDraft, ReviewDraft};
use artlog_db::entities::exhibition::{Area, Genre};
use artlog_db::query::{
    parse_area, parse_genre, parse_month, ExhibitionFilter, ExhibitionSortKey, Facet, Page,
    ReviewSortKey, SortDirection,
};
use artlog_db::repositories::{ExhibitionAroundRow, ExhibitionRow};
use artlog_core::{ExhibitionDetail, LikeStatus, ReviewView};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::PageParams,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create))
        .route("/around", get(around))
        .route("/{id}", get(detail).put(update))
        .route("/{id}", delete(remove))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/reviews", get(list_reviews).post(create_review))
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

/// Listing filters, multi-select facets comma-separated. Paging fields are
/// spelled out here because `serde_urlencoded` cannot flatten numeric fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub areas: Option<String>,
    pub months: Option<String>,
    pub genres: Option<String>,
    pub include_end: Option<bool>,
    pub query: Option<String>,
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Option<String>,
}

impl ListQuery {
    fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            size: self.size,
            sort: self.sort.clone(),
        }
    }

    fn filter(&self) -> AppResult<ExhibitionFilter> {
        let mut filter = ExhibitionFilter {
            include_end: self.include_end.unwrap_or(false),
            query: self.query.clone(),
            ..Default::default()
        };

        if let Some(raw) = &self.areas {
            filter.areas = split_facets(raw, parse_area)?;
        }
        if let Some(raw) = &self.months {
            filter.months = split_facets(raw, parse_month)?;
        }
        if let Some(raw) = &self.genres {
            filter.genres = split_facets(raw, parse_genre)?;
        }

        Ok(filter)
    }
}

fn split_facets<T>(
    raw: &str,
    parse: impl Fn(&str) -> AppResult<Facet<T>>,
) -> AppResult<Vec<Facet<T>>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect()
}

fn exhibition_sort(page: &PageParams) -> AppResult<(ExhibitionSortKey, SortDirection)> {
    match page.sort_parts()? {
        Some((key, dir)) => Ok((ExhibitionSortKey::parse(key)?, dir)),
        None => Ok((ExhibitionSortKey::default(), SortDirection::default())),
    }
}

/// Filtered, paged exhibition listing.
async fn list(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<ApiResponse<Page<ExhibitionRow>>> {
    let filter = query.filter()?;
    let params = query.page_params();
    let (sort, direction) = exhibition_sort(&params)?;

    let page = state
        .exhibition_service
        .list(
            &filter,
            viewer.viewer_id(),
            sort,
            direction,
            params.request(),
            today(),
        )
        .await?;

    Ok(ApiResponse::ok("fetched", page))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AroundQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub distance: f64,
}

/// Running exhibitions near the caller.
async fn around(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Query(query): Query<AroundQuery>,
) -> AppResult<ApiResponse<Vec<ExhibitionAroundRow>>> {
    let rows = state
        .exhibition_service
        .around(
            query.latitude,
            query.longitude,
            query.distance,
            viewer.viewer_id(),
            today(),
        )
        .await?;

    Ok(ApiResponse::ok("fetched", rows))
}

/// Exhibition detail.
async fn detail(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ExhibitionDetail>> {
    let detail = state
        .exhibition_service
        .get_detail(&id, viewer.viewer_id())
        .await?;
    Ok(ApiResponse::ok("fetched", detail))
}

/// Exhibition payload for create and update.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub genre: String,
    pub latitude: f64,
    pub longitude: f64,
    pub area: String,
    pub place: String,
    pub address: String,
    pub inquiry: String,
    pub fee: String,
    pub url: String,
    pub thumbnail: String,
}

impl ExhibitionRequest {
    fn draft(self) -> AppResult<ExhibitionDraft> {
        ExhibitionDraft::new(
            self.name,
            self.start_date,
            self.end_date,
            concrete_genre(&self.genre)?,
            self.latitude,
            self.longitude,
            concrete_area(&self.area)?,
            self.place,
            self.address,
            self.inquiry,
            self.fee,
            self.url,
            self.thumbnail,
        )
    }
}

fn concrete_area(s: &str) -> AppResult<Area> {
    match parse_area(s)? {
        Facet::Only(area) => Ok(area),
        Facet::All => Err(AppError::invalid(
            codes::INVALID_FILTER,
            "ALL is not a concrete area",
        )),
    }
}

fn concrete_genre(s: &str) -> AppResult<Genre> {
    match parse_genre(s)? {
        Facet::Only(genre) => Ok(genre),
        Facet::All => Err(AppError::invalid(
            codes::INVALID_FILTER,
            "ALL is not a concrete genre",
        )),
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitionIdResponse {
    pub exhibition_id: String,
}

/// Register an exhibition.
async fn create(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ExhibitionRequest>,
) -> AppResult<ApiResponse<ExhibitionIdResponse>> {
    let model = state.exhibition_service.create(req.draft()?).await?;
    Ok(ApiResponse::created(
        "exhibition created",
        ExhibitionIdResponse {
            exhibition_id: model.id,
        },
    ))
}

/// Replace an exhibition's fields.
async fn update(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ExhibitionRequest>,
) -> AppResult<ApiResponse<ExhibitionIdResponse>> {
    let model = state.exhibition_service.update(&id, req.draft()?).await?;
    Ok(ApiResponse::ok(
        "exhibition updated",
        ExhibitionIdResponse {
            exhibition_id: model.id,
        },
    ))
}

/// Soft-delete an exhibition.
async fn remove(
    AuthUser(_user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.exhibition_service.delete(&id).await?;
    Ok(ApiResponse::ok("exhibition deleted", ()))
}

/// Toggle the caller's like.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeStatus>> {
    let status = state.exhibition_service.toggle_like(&user.id, &id).await?;
    Ok(ApiResponse::ok("like toggled", status))
}

fn review_sort(page: &PageParams) -> AppResult<(ReviewSortKey, SortDirection)> {
    match page.sort_parts()? {
        Some((key, dir)) => Ok((ReviewSortKey::parse(key)?, dir)),
        None => Ok((ReviewSortKey::default(), SortDirection::default())),
    }
}

/// Paged reviews of an exhibition.
async fn list_reviews(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageParams>,
) -> AppResult<ApiResponse<Page<ReviewView>>> {
    let (sort, direction) = review_sort(&page)?;

    let reviews = state
        .review_service
        .list_for_exhibition(&id, viewer.viewer_id(), sort, direction, page.request())
        .await?;

    Ok(ApiResponse::ok("fetched", reviews))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub title: String,
    pub content: String,
    pub date: NaiveDate,
    pub is_public: bool,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewIdResponse {
    pub review_id: String,
}

/// Write a review for an exhibition.
async fn create_review(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateReviewRequest>,
) -> AppResult<ApiResponse<ReviewIdResponse>> {
    let draft = ReviewDraft::new(
        req.title,
        req.content,
        req.date,
        req.is_public,
        req.photos,
        today(),
    )?;

    let model = state.review_service.create(&user.id, &id, draft).await?;
    Ok(ApiResponse::created(
        "review created",
        ReviewIdResponse {
            review_id: model.id,
        },
    ))
}
