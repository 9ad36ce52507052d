//! Route configuration

use crate::auth::middleware::{auth_middleware, AuthState};
use crate::handlers::{health, igce, pricing_history};
use crate::middleware::{
    error_details_middleware, security_headers_middleware, ErrorDetailsConfig,
    SecurityHeadersConfig,
};
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use igce_core::Config;
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret().to_string(),
    });

    let protected_routes = upload_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));

    let http_concurrency_limit = config.http_concurrency_limit().max(1);
    tracing::info!(http_concurrency_limit, "HTTP concurrency limit layer enabled");

    let security_headers_config = Arc::new(SecurityHeadersConfig::new(config.is_production()));
    let error_details_config = Arc::new(ErrorDetailsConfig::new(config.is_production()));

    // Multipart bodies are bounded by RequestBodyLimitLayer instead of axum's 2MB default
    let app = public_routes()
        .merge(protected_routes)
        .layer(ConcurrencyLimitLayer::new(http_concurrency_limit))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes()))
        .layer(DefaultBodyLimit::disable())
        .layer(axum::middleware::from_fn_with_state(
            error_details_config,
            error_details_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn_with_state(
            security_headers_config,
            security_headers_middleware,
        ))
        .with_state(state);

    Ok(app)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::liveness_check))
        .route("/health/ready", get(health::readiness_check))
}

fn upload_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            igce::IGCE_UPLOAD_PATH,
            get(igce::upload_form).post(igce::upload_submit),
        )
        .route(igce::IGCE_INDEX_PATH, get(igce::index))
        .route(
            pricing_history::PRICING_HISTORY_PATH,
            get(pricing_history::upload_form).post(pricing_history::upload_submit),
        )
}
