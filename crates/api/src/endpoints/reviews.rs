//! Review endpoints.

use artlog_common::AppResult;
use artlog_core::domain::{CommentDraft, ReviewDraft};
use artlog_core::{CommentThread, LikeStatus, ReviewView};
use artlog_db::query::{CommentSortKey, Page, SortDirection};
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
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
        .route("/{id}", get(detail).put(update).delete(remove))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/comments", get(list_comments).post(create_comment))
}

/// Review detail. Private reviews are only visible to their author.
async fn detail(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReviewView>> {
    let view = state
        .review_service
        .get_detail(&id, viewer.viewer_id())
        .await?;
    Ok(ApiResponse::ok("fetched", view))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewRequest {
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

/// Rewrite a review. Author only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateReviewRequest>,
) -> AppResult<ApiResponse<ReviewIdResponse>> {
    let draft = ReviewDraft::new(
        req.title,
        req.content,
        req.date,
        req.is_public,
        req.photos,
        chrono::Utc::now().date_naive(),
    )?;

    let model = state.review_service.update(&user.id, &id, draft).await?;
    Ok(ApiResponse::ok(
        "review updated",
        ReviewIdResponse {
            review_id: model.id,
        },
    ))
}

/// Soft-delete a review. Author only.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.review_service.delete(&user.id, &id).await?;
    Ok(ApiResponse::ok("review deleted", ()))
}

/// Toggle the caller's like.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeStatus>> {
    let status = state.review_service.toggle_like(&user.id, &id).await?;
    Ok(ApiResponse::ok("like toggled", status))
}

/// Paged comment threads of a review, replies inlined up to the limit.
async fn list_comments(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageParams>,
) -> AppResult<ApiResponse<Page<CommentThread>>> {
    let (sort, direction) = match page.sort_parts()? {
        Some((key, dir)) => (CommentSortKey::parse(key)?, dir),
        None => (CommentSortKey::default(), SortDirection::default()),
    };

    let threads = state
        .comment_service
        .list_for_review(&id, viewer.viewer_id(), sort, direction, page.request())
        .await?;

    Ok(ApiResponse::ok("fetched", threads))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCommentRequest {
    pub content: String,
    pub parent_id: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentIdResponse {
    pub comment_id: String,
}

/// Write a comment or a reply under a review.
async fn create_comment(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CreateCommentRequest>,
) -> AppResult<ApiResponse<CommentIdResponse>> {
    let draft = CommentDraft::new(req.content, req.parent_id)?;

    let model = state.comment_service.create(&user.id, &id, draft).await?;
    Ok(ApiResponse::created(
        "comment created",
        CommentIdResponse {
            comment_id: model.id,
        },
    ))
}
