use crate::auth::models::JwtClaims;
use crate::error::HttpAppError;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use igce_core::AppError;
use std::sync::Arc;

/// Cookie consulted when no `Authorization` header is sent
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

#[derive(Clone)]
pub struct AuthState {
    pub jwt_secret: String,
}

fn bearer_token(headers: &HeaderMap) -> Result<Option<String>, AppError> {
    let Some(value) = headers.get(header::AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;
    match value.strip_prefix("Bearer ") {
        Some(token) => Ok(Some(token.trim().to_string())),
        None => Err(AppError::Unauthorized(
            "Invalid authorization header format".to_string(),
        )),
    }
}

fn cookie_token(jar: &CookieJar) -> Option<String> {
    jar.get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value_trimmed().to_string())
        .filter(|token| !token.is_empty())
}

/// Authenticate the request and insert its `UserContext` extension
pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(request.headers()) {
        Ok(Some(token)) => token,
        Ok(None) => match cookie_token(&jar) {
            Some(token) => token,
            None => {
                tracing::debug!("Request without credentials");
                return HttpAppError(AppError::Unauthorized(
                    "Missing authorization header".to_string(),
                ))
                .into_response();
            }
        },
        Err(e) => return HttpAppError(e).into_response(),
    };

    let claims = match JwtClaims::decode(&token, &auth_state.jwt_secret) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected access token");
            return HttpAppError(AppError::Unauthorized("Invalid or expired token".to_string()))
                .into_response();
        }
    };

    let user = claims.into_user();
    tracing::debug!(user_id = %user.user_id, username = %user.username, "Authenticated request");
    request.extensions_mut().insert(user);
    next.run(request).await
}
