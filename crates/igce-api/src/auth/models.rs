use crate::error::ErrorResponse;
use axum::extract::FromRequestParts;
use axum::http::{request::Parts, StatusCode};
use axum::Json;
use chrono::{Duration, Utc};
use igce_core::models::UserContext;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: Uuid, // user_id
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64, // expiration timestamp
    pub iat: i64, // issued at timestamp
}

impl JwtClaims {
    pub fn new(user: &UserContext, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.user_id,
            username: user.username.clone(),
            roles: user.roles.clone(),
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }

    /// Sign with HS256
    pub fn encode(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::new(Algorithm::HS256),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify signature and expiry
    pub fn decode(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        let data = decode::<JwtClaims>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )?;
        Ok(data.claims)
    }

    pub fn into_user(self) -> UserContext {
        UserContext {
            user_id: self.sub,
            username: self.username,
            roles: self.roles,
        }
    }
}

/// Authenticated user, inserted into request extensions by the auth middleware
#[derive(Debug, Clone)]
pub struct CurrentUser(pub UserContext);

// Extension cannot be combined with Multipart, so read the extensions directly
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UserContext>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(ErrorResponse {
                        error: "Missing user context".to_string(),
                        details: None,
                        error_type: None,
                        code: "MISSING_USER_CONTEXT".to_string(),
                        recoverable: false,
                        suggested_action: Some("Check authentication token".to_string()),
                    }),
                )
            })
    }
}
