pub mod keys;
pub mod verifier;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;

pub use keys::{KeySetError, KeySource, RemoteJwks, StaticJwks};
pub use verifier::{bearer_token, TokenVerifier};

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

/// `aud` is either a single string or a list depending on the requested scopes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(aud) => aud == audience,
            Audience::Many(auds) => auds.iter().any(|aud| aud == audience),
        }
    }
}

/// Verified access token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: String,
    pub iss: String,
    pub aud: Audience,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub permissions: Option<HashSet<String>>,
}

impl Claims {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions
            .as_ref()
            .is_some_and(|granted| granted.contains(permission))
    }
}

/// Authorization failure with a machine readable code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{code}: {description}")]
pub struct AuthError {
    pub code: &'static str,
    pub description: String,
    pub status: StatusCode,
}

impl AuthError {
    fn new(code: &'static str, description: impl Into<String>, status: StatusCode) -> Self {
        Self {
            code,
            description: description.into(),
            status,
        }
    }

    pub fn header_missing() -> Self {
        Self::new(
            "authorization_header_missing",
            "Authorization header is expected.",
            StatusCode::UNAUTHORIZED,
        )
    }

    pub fn invalid_header(description: impl Into<String>) -> Self {
        Self::new("invalid_header", description, StatusCode::BAD_REQUEST)
    }

    pub fn token_expired() -> Self {
        Self::new("token_expired", "Token expired.", StatusCode::UNAUTHORIZED)
    }

    pub fn invalid_claims(description: impl Into<String>) -> Self {
        Self::new("invalid_claims", description, StatusCode::UNAUTHORIZED)
    }

    pub fn unauthorized(permission: &str) -> Self {
        Self::new(
            "unauthorized",
            format!("Permission '{}' not found.", permission),
            StatusCode::UNAUTHORIZED,
        )
    }

    pub fn key_set_unavailable() -> Self {
        Self::new(
            "jwks_unavailable",
            "Unable to fetch signing keys.",
            StatusCode::INTERNAL_SERVER_ERROR,
        )
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = json!({
            "success": false,
            "error": self.status.as_u16(),
            "code": self.code,
            "message": self.description,
        });
        (self.status, Json(body)).into_response()
    }
}

/// Require `permission` among the token's granted permissions
pub fn check_permissions(permission: &str, claims: &Claims) -> Result<(), AuthError> {
    if claims.permissions.is_none() {
        return Err(AuthError::invalid_claims("Permissions not included in JWT."));
    }
    if !claims.has_permission(permission) {
        return Err(AuthError::unauthorized(permission));
    }
    Ok(())
}
