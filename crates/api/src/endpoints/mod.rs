//! API endpoints.

mod auth;
mod comments;
mod exhibitions;
mod reviews;
mod users;

use artlog_common::AppResult;
use artlog_db::query::{PageRequest, SortDirection};
use axum::Router;
use serde::Deserialize;

use crate::middleware::AppState;

/// Create the API router, nested under `/api` by the binary.
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/exhibitions", exhibitions::router())
        .nest("/reviews", reviews::router())
        .nest("/comments", comments::router())
}

/// Common listing query parameters: `page`, `size`, and `sort` as
/// `property,ASC|DESC`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct PageParams {
    page: Option<u64>,
    size: Option<u64>,
    sort: Option<String>,
}

impl PageParams {
    pub(crate) fn request(&self) -> PageRequest {
        match (self.page, self.size) {
            (None, None) => PageRequest::default(),
            (page, size) => PageRequest::new(page.unwrap_or(0), size.unwrap_or(20)),
        }
    }

    /// The sort key text and direction, when a `sort` parameter was sent.
    /// Direction defaults to descending when omitted.
    pub(crate) fn sort_parts(&self) -> AppResult<Option<(&str, SortDirection)>> {
        let Some(raw) = self.sort.as_deref() else {
            return Ok(None);
        };

        match raw.split_once(',') {
            Some((key, dir)) => Ok(Some((key.trim(), SortDirection::parse(dir.trim())?))),
            None => Ok(Some((raw.trim(), SortDirection::default()))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_parts_key_and_direction() {
        let params = PageParams {
            sort: Some("createdAt,ASC".to_string()),
            ..Default::default()
        };

        let (key, dir) = params.sort_parts().unwrap().unwrap();
        assert_eq!(key, "createdAt");
        assert_eq!(dir, SortDirection::Asc);
    }

    #[test]
    fn test_sort_parts_direction_defaults_desc() {
        let params = PageParams {
            sort: Some("likeCount".to_string()),
            ..Default::default()
        };

        let (key, dir) = params.sort_parts().unwrap().unwrap();
        assert_eq!(key, "likeCount");
        assert_eq!(dir, SortDirection::Desc);
    }

    #[test]
    fn test_sort_parts_bad_direction_rejected() {
        let params = PageParams {
            sort: Some("createdAt,SIDEWAYS".to_string()),
            ..Default::default()
        };

        assert!(params.sort_parts().is_err());
    }

    #[test]
    fn test_request_defaults() {
        let params = PageParams::default();
        assert_eq!(params.request(), PageRequest::new(0, 20));
    }
}
