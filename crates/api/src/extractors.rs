//! Request extractors.

use artlog_common::ANONYMOUS_VIEWER;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use artlog_db::entities::user;

/// Authenticated user extractor. Rejects when the auth middleware resolved
/// no account.
#[derive(Debug, Clone)]
pub struct AuthUser(pub user::Model);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<user::Model>()
            .cloned()
            .map(AuthUser)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized"))
    }
}

/// Optional authenticated user extractor for endpoints that render
/// differently for signed-in viewers.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<user::Model>);

impl MaybeAuthUser {
    /// The viewer ID for like/visibility predicates: the account ID when
    /// signed in, the anonymous sentinel otherwise.
    #[must_use]
    pub fn viewer_id(&self) -> &str {
        self.0.as_ref().map_or(ANONYMOUS_VIEWER, |u| u.id.as_str())
    }
}

impl<S> FromRequestParts<S> for MaybeAuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(parts.extensions.get::<user::Model>().cloned()))
    }
}
