use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::{decode, decode_header, errors::ErrorKind, jwk::Jwk, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

use super::keys::{KeySetError, KeySource, RemoteJwks, StaticJwks};
use super::{AuthError, Claims};
use crate::config::AuthConfig;

/// Pull the token out of `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or_else(AuthError::header_missing)?;
    let value = value
        .to_str()
        .map_err(|_| AuthError::invalid_header("Authorization header must be plain text."))?;

    let parts: Vec<&str> = value.split(' ').collect();
    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => Ok(*token),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::invalid_header(
            "Authorization header must start with \"Bearer\".",
        )),
        [_] => Err(AuthError::invalid_header("Token not found.")),
        _ => Err(AuthError::invalid_header("Authorization header must be bearer token.")),
    }
}

/// Verifies RS256 access tokens issued by the configured provider
pub struct TokenVerifier {
    keys: Arc<dyn KeySource>,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig, keys: Arc<dyn KeySource>) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&config.audience]);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = config.leeway_secs;

        Self { keys, validation }
    }

    /// Pick the key source described by the config
    pub fn from_config(config: &AuthConfig) -> Result<Self, KeySetError> {
        let keys: Arc<dyn KeySource> = match &config.jwks_path {
            Some(path) => Arc::new(StaticJwks::from_path(path)?),
            None => Arc::new(RemoteJwks::new(
                config.jwks_url.clone(),
                Duration::from_secs(config.jwks_cache_ttl_secs),
            )?),
        };
        Ok(Self::new(config, keys))
    }

    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::invalid_header("Unable to parse authentication token."))?;
        let kid = header
            .kid
            .ok_or_else(|| AuthError::invalid_header("Authorization malformed."))?;

        let jwk = self.find_key(&kid).await?;
        let key = DecodingKey::from_jwk(&jwk)
            .map_err(|_| AuthError::invalid_header("Unable to find the appropriate key."))?;

        let data = decode::<Claims>(token, &key, &self.validation).map_err(|e| {
            debug!("Token rejected: {}", e);
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::token_expired(),
                ErrorKind::InvalidAudience
                | ErrorKind::InvalidIssuer
                | ErrorKind::MissingRequiredClaim(_)
                | ErrorKind::ImmatureSignature => AuthError::invalid_claims(
                    "Incorrect claims. Please, check the audience and issuer.",
                ),
                _ => AuthError::invalid_header("Unable to parse authentication token."),
            }
        })?;

        Ok(data.claims)
    }

    async fn find_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        let keys = self.keys.key_set().await.map_err(|e| {
            error!("Signing keys unavailable: {}", e);
            AuthError::key_set_unavailable()
        })?;
        if let Some(jwk) = keys.find(kid) {
            return Ok(jwk.clone());
        }

        if self.keys.caches() {
            // The provider may have rotated keys since the cache was filled
            warn!("Unknown key id {}, refreshing JWKS", kid);
            let keys = self.keys.refresh().await.map_err(|e| {
                error!("Signing keys unavailable: {}", e);
                AuthError::key_set_unavailable()
            })?;
            if let Some(jwk) = keys.find(kid) {
                return Ok(jwk.clone());
            }
        }

        Err(AuthError::invalid_header("Unable to find the appropriate key."))
    }
}
