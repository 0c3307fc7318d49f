use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;

/// Success envelope: `{"success": true, <field>: <data>}`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub field: &'static str,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// `{"success": true, "drinks": ...}`
    pub fn drinks(data: T) -> Self {
        Self { field: "drinks", data }
    }

    /// `{"success": true, "delete": ...}`
    pub fn deleted(data: T) -> Self {
        Self { field: "delete", data }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return ApiError::internal_server_error("Failed to serialize response data")
                    .into_response();
            }
        };

        let mut envelope = Map::new();
        envelope.insert("success".to_string(), Value::Bool(true));
        envelope.insert(self.field.to_string(), data_value);

        (StatusCode::OK, Json(Value::Object(envelope))).into_response()
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

/// Router fallback for unknown paths
pub async fn not_found_fallback() -> ApiError {
    ApiError::not_found("no route matches the request")
}

/// Give bodiless framework error responses (e.g. 405 from method routing)
/// the same JSON envelope as handler errors. Other headers such as `Allow`
/// are kept.
pub async fn error_envelope(response: Response) -> Response {
    if response.headers().contains_key(CONTENT_TYPE) {
        return response;
    }
    let Some(err) = ApiError::from_status(response.status()) else {
        return response;
    };

    let (mut parts, _) = response.into_parts();
    let body = Json(err.to_json()).into_response();
    if let Some(content_type) = body.headers().get(CONTENT_TYPE) {
        parts.headers.insert(CONTENT_TYPE, content_type.clone());
    }
    parts.headers.remove(axum::http::header::CONTENT_LENGTH);
    Response::from_parts(parts, body.into_body())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::header::ALLOW;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn wraps_data_under_the_named_field() {
        let response = ApiResponse::deleted(3).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({"success": true, "delete": 3}));
    }

    #[tokio::test]
    async fn rewrites_bare_method_not_allowed() {
        let bare = Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(ALLOW, "GET,HEAD")
            .body(Body::empty())
            .unwrap();

        let response = error_envelope(bare).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[ALLOW], "GET,HEAD");
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": 405, "message": "Invalid Method"})
        );
    }

    #[tokio::test]
    async fn leaves_json_responses_alone() {
        let response = error_envelope(ApiError::not_found("x").into_response()).await;
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": 404, "message": "Resource Not Found"})
        );
    }
}
