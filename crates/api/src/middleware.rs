//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};
use artlog_core::{CommentService, ExhibitionService, ReviewService, UserService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    /// Accounts and credentials.
    pub user_service: UserService,
    /// Exhibitions and exhibition likes.
    pub exhibition_service: ExhibitionService,
    /// Reviews and review likes.
    pub review_service: ReviewService,
    /// Comment threads and comment likes.
    pub comment_service: CommentService,
}

/// Authentication middleware.
///
/// A valid bearer token puts the account into request extensions for the
/// `AuthUser` / `MaybeAuthUser` extractors; anything else passes through
/// anonymously and protected handlers reject at extraction.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
        && let Ok(user) = state.user_service.authenticate(token).await
    {
        req.extensions_mut().insert(user);
    }

    next.run(req).await
}
