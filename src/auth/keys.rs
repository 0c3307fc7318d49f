//! Signing key sources for token verification.
//!
//! Keys come from the identity provider's published JSON Web Key Set, either
//! fetched over HTTP (`RemoteJwks`) or read once from a local file
//! (`StaticJwks`).

use async_trait::async_trait;
use jsonwebtoken::jwk::JwkSet;
use reqwest::Client;
use std::path::Path;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("Failed to fetch JWKS: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to read JWKS file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse JWKS: {0}")]
    Parse(#[from] serde_json::Error),
}

#[async_trait]
pub trait KeySource: Send + Sync {
    /// Current key set, possibly cached
    async fn key_set(&self) -> Result<JwkSet, KeySetError>;

    /// Key set bypassing any cache
    async fn refresh(&self) -> Result<JwkSet, KeySetError> {
        self.key_set().await
    }

    /// Whether `refresh` can return something `key_set` did not
    fn caches(&self) -> bool {
        false
    }
}

/// Fixed key set
pub struct StaticJwks {
    keys: JwkSet,
}

impl StaticJwks {
    pub fn new(keys: JwkSet) -> Self {
        Self { keys }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, KeySetError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::new(serde_json::from_str(&text)?))
    }
}

#[async_trait]
impl KeySource for StaticJwks {
    async fn key_set(&self) -> Result<JwkSet, KeySetError> {
        Ok(self.keys.clone())
    }
}

/// Key set fetched from a `.well-known/jwks.json` endpoint.
///
/// A zero TTL fetches on every call.
pub struct RemoteJwks {
    client: Client,
    url: String,
    ttl: Duration,
    cache: RwLock<Option<CachedJwks>>,
}

struct CachedJwks {
    keys: JwkSet,
    fetched_at: Instant,
}

impl RemoteJwks {
    pub fn new(url: impl Into<String>, ttl: Duration) -> Result<Self, KeySetError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self {
            client,
            url: url.into(),
            ttl,
            cache: RwLock::new(None),
        })
    }

    async fn fetch(&self) -> Result<JwkSet, KeySetError> {
        debug!("Fetching JWKS from {}", self.url);
        let keys = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json::<JwkSet>()
            .await?;

        if !self.ttl.is_zero() {
            let mut cache = self.cache.write().await;
            *cache = Some(CachedJwks {
                keys: keys.clone(),
                fetched_at: Instant::now(),
            });
        }

        Ok(keys)
    }
}

#[async_trait]
impl KeySource for RemoteJwks {
    async fn key_set(&self) -> Result<JwkSet, KeySetError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.fetched_at.elapsed() < self.ttl {
                    return Ok(cached.keys.clone());
                }
            }
        }

        self.fetch().await
    }

    async fn refresh(&self) -> Result<JwkSet, KeySetError> {
        self.fetch().await
    }

    fn caches(&self) -> bool {
        !self.ttl.is_zero()
    }
}
