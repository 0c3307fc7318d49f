// HTTP API Error Types
use axum::{extract::rejection::JsonRejection, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::manager::DatabaseError;
use crate::database::models::RecipeError;

/// HTTP API error. The envelope carries a fixed message per status; the
/// detail string is only logged.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // 400 Bad Request
    #[error("bad request: {0}")]
    BadRequest(String),

    // 401 Unauthorized
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    // 403 Forbidden
    #[error("forbidden: {0}")]
    Forbidden(String),

    // 404 Not Found
    #[error("not found: {0}")]
    NotFound(String),

    // 405 Method Not Allowed
    #[error("method not allowed")]
    MethodNotAllowed,

    // 409 Conflict
    #[error("conflict: {0}")]
    Conflict(String),

    // 422 Unprocessable Entity
    #[error("unprocessable: {0}")]
    UnprocessableEntity(String),

    // 500 Internal Server Error
    #[error("internal error: {0}")]
    InternalServerError(String),

    // Carries its own status and body
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::UnprocessableEntity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(err) => err.status,
        }
    }

    /// Client facing message for the status
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::Unauthorized(_) => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::NotFound(_) => "Resource Not Found",
            ApiError::MethodNotAllowed => "Invalid Method",
            ApiError::Conflict(_) => "Duplicate Resource",
            ApiError::UnprocessableEntity(_) => "Not Processable",
            ApiError::InternalServerError(_) => "Server Error",
            ApiError::Auth(err) => &err.description,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "success": false,
            "error": self.status_code().as_u16(),
            "message": self.message(),
        })
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn unprocessable_entity(message: impl Into<String>) -> Self {
        ApiError::UnprocessableEntity(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Envelope for a status produced outside our handlers (routing, body limits)
    pub fn from_status(status: StatusCode) -> Option<Self> {
        let detail = || format!("framework response {}", status);
        match status {
            StatusCode::BAD_REQUEST => Some(ApiError::BadRequest(detail())),
            StatusCode::UNAUTHORIZED => Some(ApiError::Unauthorized(detail())),
            StatusCode::FORBIDDEN => Some(ApiError::Forbidden(detail())),
            StatusCode::NOT_FOUND => Some(ApiError::NotFound(detail())),
            StatusCode::METHOD_NOT_ALLOWED => Some(ApiError::MethodNotAllowed),
            StatusCode::CONFLICT => Some(ApiError::Conflict(detail())),
            StatusCode::UNPROCESSABLE_ENTITY => Some(ApiError::UnprocessableEntity(detail())),
            StatusCode::INTERNAL_SERVER_ERROR => Some(ApiError::InternalServerError(detail())),
            _ => None,
        }
    }
}

impl From<DatabaseError> for ApiError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(msg) => ApiError::Conflict(msg),
            DatabaseError::InvalidRecipe(e) => e.into(),
            err @ DatabaseError::CorruptRecipe { .. } => {
                tracing::error!("{}", err);
                ApiError::internal_server_error("stored drink is unreadable")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("database error occurred")
            }
        }
    }
}

impl From<RecipeError> for ApiError {
    fn from(err: RecipeError) -> Self {
        ApiError::unprocessable_entity(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Auth(err) => err.into_response(),
            other => {
                let status = other.status_code();
                if status.is_server_error() {
                    tracing::error!("{}", other);
                } else {
                    tracing::debug!("{}", other);
                }
                (status, Json(other.to_json())).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_uses_fixed_messages() {
        let err = ApiError::not_found("drink 7");
        assert_eq!(
            err.to_json(),
            json!({"success": false, "error": 404, "message": "Resource Not Found"})
        );
        assert_eq!(ApiError::UnprocessableEntity("x".into()).message(), "Not Processable");
        assert_eq!(ApiError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn database_errors_choose_their_status() {
        let not_found: ApiError = DatabaseError::NotFound("drink 1".into()).into();
        let conflict: ApiError = DatabaseError::Conflict("water".into()).into();
        let invalid: ApiError = DatabaseError::InvalidRecipe(RecipeError::Empty).into();
        let storage: ApiError = DatabaseError::Sqlx(sqlx::Error::PoolTimedOut).into();

        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(storage.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn only_known_statuses_get_an_envelope() {
        let err = ApiError::from_status(StatusCode::METHOD_NOT_ALLOWED).unwrap();
        assert_eq!(err.message(), "Invalid Method");
        assert_eq!(ApiError::from_status(StatusCode::FORBIDDEN).unwrap().message(), "Forbidden");
        assert!(ApiError::from_status(StatusCode::PAYLOAD_TOO_LARGE).is_none());
        assert!(ApiError::from_status(StatusCode::OK).is_none());
    }

    #[test]
    fn auth_errors_keep_their_own_status() {
        let err: ApiError = AuthError::token_expired().into();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Token expired.");
    }
}
