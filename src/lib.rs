pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    handler::Handler,
    http::{header, HeaderValue, Method},
    middleware::{from_fn_with_state, map_response},
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::{DELETE_DRINKS, GET_DRINKS_DETAIL, PATCH_DRINKS, POST_DRINKS};
use crate::config::SecurityConfig;
use crate::middleware::{error_envelope, not_found_fallback, require_permission};
use crate::state::AppState;

/// Build the HTTP application around an explicitly constructed state
pub fn app(state: AppState) -> Router {
    use handlers::{protected, public};

    Router::new()
        // Public
        .route("/health", get(public::health_get))
        .route(
            "/drinks",
            get(public::drinks_get).post(
                protected::drinks_post
                    .layer(from_fn_with_state(state.require(POST_DRINKS), require_permission)),
            ),
        )
        // Protected
        .route(
            "/drinks-detail",
            get(protected::drinks_detail_get
                .layer(from_fn_with_state(state.require(GET_DRINKS_DETAIL), require_permission))),
        )
        .route(
            "/drinks/:id",
            patch(
                protected::drink_patch
                    .layer(from_fn_with_state(state.require(PATCH_DRINKS), require_permission)),
            )
            .delete(
                protected::drink_delete
                    .layer(from_fn_with_state(state.require(DELETE_DRINKS), require_permission)),
            ),
        )
        .fallback(not_found_fallback)
        // Global middleware
        .layer(map_response(error_envelope))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes))
        .layer(cors_layer(&state.config.security))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.is_empty() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
