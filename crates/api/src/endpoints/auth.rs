//! Authentication endpoints.

use artlog_common::AppResult;
use artlog_core::domain::SignupDraft;
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{middleware::AppState, response::ApiResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(signup))
        .route("/login", post(login))
        .route("/oauth", post(oauth_login))
}

/// Signup request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub nickname: String,
    pub password: String,
}

/// Authentication response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user_id: String,
    pub email: String,
    pub nickname: String,
    pub token: String,
}

/// Create a local account.
async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let draft = SignupDraft::new(req.email, req.nickname, req.password)?;
    let authed = state.user_service.signup(draft).await?;

    Ok(ApiResponse::created(
        "signed up",
        AuthResponse {
            user_id: authed.user.id,
            email: authed.user.email,
            nickname: authed.user.nickname,
            token: authed.token,
        },
    ))
}

/// Login request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Sign in with email and password.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let authed = state.user_service.login(&req.email, &req.password).await?;

    Ok(ApiResponse::ok(
        "signed in",
        AuthResponse {
            user_id: authed.user.id,
            email: authed.user.email,
            nickname: authed.user.nickname,
            token: authed.token,
        },
    ))
}

/// OAuth login request; the provider has already vouched for the email.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OauthLoginRequest {
    pub provider: String,
    pub email: String,
    pub nickname: String,
}

/// Sign in through an OAuth provider, provisioning on first contact.
async fn oauth_login(
    State(state): State<AppState>,
    Json(req): Json<OauthLoginRequest>,
) -> AppResult<ApiResponse<AuthResponse>> {
    let authed = state
        .user_service
        .oauth_login(&req.provider, &req.email, &req.nickname)
        .await?;

    Ok(ApiResponse::ok(
        "signed in",
        AuthResponse {
            user_id: authed.user.id,
            email: authed.user.email,
            nickname: authed.user.nickname,
            token: authed.token,
        },
    ))
}
