//! Comment endpoints.

use artlog_common::AppResult;
use artlog_core::{CommentView, LikeStatus};
use artlog_db::query::Page;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{
    endpoints::PageParams,
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(update).delete(remove))
        .route("/{id}/like", post(toggle_like))
        .route("/{id}/children", get(list_children))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCommentRequest {
    pub content: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentIdResponse {
    pub comment_id: String,
}

/// Edit a comment's body. Author only.
async fn update(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCommentRequest>,
) -> AppResult<ApiResponse<CommentIdResponse>> {
    let model = state
        .comment_service
        .update(&user.id, &id, req.content)
        .await?;
    Ok(ApiResponse::ok(
        "comment updated",
        CommentIdResponse {
            comment_id: model.id,
        },
    ))
}

/// Soft-delete a comment, leaving a tombstone in its thread.
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state.comment_service.delete(&user.id, &id).await?;
    Ok(ApiResponse::ok("comment deleted", ()))
}

/// Toggle the caller's like.
async fn toggle_like(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<LikeStatus>> {
    let status = state.comment_service.toggle_like(&user.id, &id).await?;
    Ok(ApiResponse::ok("like toggled", status))
}

/// Paged replies of one top-level comment, oldest first.
async fn list_children(
    viewer: MaybeAuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(page): Query<PageParams>,
) -> AppResult<ApiResponse<Page<CommentView>>> {
    let views = state
        .comment_service
        .list_children(&id, viewer.viewer_id(), page.request())
        .await?;

    Ok(ApiResponse::ok("fetched", views))
}
