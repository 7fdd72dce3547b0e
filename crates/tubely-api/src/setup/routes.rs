//! Route configuration and setup

use crate::auth::middleware::auth_middleware;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;
use tubely_storage::factory::ASSETS_ROUTE;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Router<()> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/healthz", get(handlers::health::health_check))
        .route(
            "/api/thumbnails/{videoID}",
            get(handlers::thumbnail_get::get_thumbnail),
        );

    // Protected routes (require a bearer token)
    let protected_routes = Router::new()
        .route("/api/videos", post(handlers::videos::create_video))
        .route("/api/videos/{videoID}", get(handlers::videos::get_video))
        .route(
            "/api/thumbnail_upload/{videoID}",
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(config.max_thumbnail_size_bytes())),
        )
        .route(
            "/api/video_upload/{videoID}",
            post(handlers::video_upload::upload_video)
                .layer(DefaultBodyLimit::max(config.max_video_size_bytes())),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public_routes
        .merge(protected_routes)
        .nest_service(ASSETS_ROUTE, ServeDir::new(config.assets_root()))
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit()))
        .layer(RequestBodyLimitLayer::new(
            config
                .max_video_size_bytes()
                .max(config.max_thumbnail_size_bytes()),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
