use crate::error::ErrorResponse;
use axum::{
    body::Body,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct ErrorDetailsConfig {
    /// Expose `details` and `error_type` in error bodies
    pub show_details: bool,
}

impl ErrorDetailsConfig {
    pub fn new(is_production: bool) -> Self {
        Self {
            show_details: !is_production,
        }
    }
}

/// Re-render error bodies with their diagnostic fields outside production
pub async fn error_details_middleware(
    State(config): State<Arc<ErrorDetailsConfig>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let Some(detailed) = response.extensions_mut().remove::<Arc<ErrorResponse>>() else {
        return response;
    };
    if !config.show_details {
        return response;
    }

    match serde_json::to_vec(detailed.as_ref()) {
        Ok(body) => {
            response.headers_mut().remove(header::CONTENT_LENGTH);
            *response.body_mut() = Body::from(body);
        }
        Err(e) => tracing::warn!(error = %e, "Failed to render error details"),
    }
    response
}
