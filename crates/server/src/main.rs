//! Artlog server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use artlog_api::{middleware::AppState, router as api_router};
use artlog_common::{Config, TokenIssuer};
use artlog_core::{CommentService, ExhibitionService, ReviewService, UserService};
use artlog_db::repositories::{
    CommentLikeRepository, CommentRepository, ExhibitionLikeRepository, ExhibitionRepository,
    ReviewLikeRepository, ReviewRepository, RoleRepository, UserRepository,
};
use axum::{middleware, Router};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artlog=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting artlog server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database
    let db = artlog_db::init(&config).await?;
    info!("Connected to database");

    // Run migrations
    info!("Running database migrations...");
    artlog_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let user_repo = UserRepository::new(Arc::clone(&db));
    let role_repo = RoleRepository::new(Arc::clone(&db));
    let exhibition_repo = ExhibitionRepository::new(Arc::clone(&db));
    let exhibition_like_repo = ExhibitionLikeRepository::new(Arc::clone(&db));
    let review_repo = ReviewRepository::new(Arc::clone(&db));
    let review_like_repo = ReviewLikeRepository::new(Arc::clone(&db));
    let comment_repo = CommentRepository::new(Arc::clone(&db));
    let comment_like_repo = CommentLikeRepository::new(Arc::clone(&db));

    // Initialize services
    let token_issuer = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_ttl_secs);
    let user_service = UserService::new(user_repo.clone(), role_repo, token_issuer);
    let exhibition_service = ExhibitionService::new(
        exhibition_repo.clone(),
        exhibition_like_repo,
        review_repo.clone(),
    );
    let review_service = ReviewService::new(
        review_repo.clone(),
        review_like_repo,
        exhibition_repo.clone(),
    );
    let comment_service = CommentService::new(
        comment_repo,
        comment_like_repo,
        review_repo,
        user_repo,
    );

    // Create app state
    let state = AppState {
        user_service,
        exhibition_service,
        review_service,
        comment_service,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            artlog_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr: SocketAddr = config.bind_addr().parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
