//! HTTP API layer for artlog.
//!
//! - **Endpoints**: REST routers per domain, nested under `/api`
//! - **Extractors**: authentication and pagination
//! - **Middleware**: bearer-token resolution into request extensions
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
