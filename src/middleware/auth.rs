use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::auth::{bearer_token, check_permissions, AuthError, TokenVerifier};

/// Guard state: which permission a route needs and how to verify tokens
#[derive(Clone)]
pub struct RequirePermission {
    verifier: Arc<TokenVerifier>,
    permission: &'static str,
}

impl RequirePermission {
    pub fn new(verifier: Arc<TokenVerifier>, permission: &'static str) -> Self {
        Self { verifier, permission }
    }
}

/// Verifies the bearer token, checks the permission, and hands the typed
/// `Claims` to the handler through request extensions.
pub async fn require_permission(
    State(guard): State<RequirePermission>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(request.headers())?.to_string();
    let claims = guard.verifier.verify(&token).await?;
    check_permissions(guard.permission, &claims)?;

    debug!("{} granted {}", claims.sub, guard.permission);
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
