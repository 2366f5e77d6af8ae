//! Account endpoints.

use artlog_common::AppResult;
use axum::{
    extract::State,
    routing::{delete, get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me", delete(quit))
        .route("/me/nickname", patch(change_nickname))
        .route("/me/profile-image", patch(change_profile_image))
        .route("/me/password", patch(change_password))
}

/// Account view, never exposing credentials.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
    pub profile_image: Option<String>,
}

impl UserResponse {
    fn from_model(user: artlog_db::entities::user::Model) -> Self {
        Self {
            user_id: user.id,
            email: user.email,
            nickname: user.nickname,
            profile_image: user.profile_image,
        }
    }
}

/// Account profile: the base view plus granted role names.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    /// Granted role names, e.g. `ROLE_USER`.
    pub roles: Vec<String>,
}

/// The signed-in account.
async fn me(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let roles = state.user_service.roles_of(&user.id).await?;
    Ok(ApiResponse::ok(
        "fetched",
        ProfileResponse {
            user: UserResponse::from_model(user),
            roles,
        },
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeNicknameRequest {
    pub nickname: String,
}

async fn change_nickname(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangeNicknameRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .change_nickname(&user.id, &req.nickname)
        .await?;
    Ok(ApiResponse::ok("nickname changed", UserResponse::from_model(updated)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeProfileImageRequest {
    pub profile_image: String,
}

async fn change_profile_image(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangeProfileImageRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let updated = state
        .user_service
        .change_profile_image(&user.id, &req.profile_image)
        .await?;
    Ok(ApiResponse::ok(
        "profile image changed",
        UserResponse::from_model(updated),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

async fn change_password(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> AppResult<ApiResponse<()>> {
    state
        .user_service
        .change_password(&user.id, &req.current_password, &req.new_password)
        .await?;
    Ok(ApiResponse::ok("password changed", ()))
}

/// Soft-quit the account.
async fn quit(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.quit(&user.id).await?;
    Ok(ApiResponse::ok("account closed", ()))
}
