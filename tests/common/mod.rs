#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, jwk::JwkSet, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use drinks_api::auth::{KeySource, StaticJwks, TokenVerifier};
use drinks_api::config::{AppConfig, AuthConfig, DatabaseConfig};
use drinks_api::database::{DatabaseManager, DrinkRepository};
use drinks_api::state::AppState;

pub const JWKS: &str = include_str!("../fixtures/jwks.json");
pub const SIGNING_KEY: &[u8] = include_bytes!("../fixtures/signing_key.pem");
pub const ROGUE_KEY: &[u8] = include_bytes!("../fixtures/rogue_key.pem");
pub const KID: &str = "drinks-test-key";
pub const DOMAIN: &str = "drinks-test.auth0.com";
pub const AUDIENCE: &str = "drinks";

pub const ALL_PERMISSIONS: &[&str] = &[
    "get:drinks-detail",
    "post:drinks",
    "patch:drinks",
    "delete:drinks",
];

pub fn auth_config() -> AuthConfig {
    AuthConfig::for_domain(DOMAIN, AUDIENCE)
}

pub fn fixture_keys() -> JwkSet {
    serde_json::from_str(JWKS).expect("fixture JWKS parses")
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Fresh in-memory database, keys from the fixture JWKS
    pub async fn new() -> Result<Self> {
        Self::with_keys(Arc::new(StaticJwks::new(fixture_keys()))).await
    }

    pub async fn with_keys(keys: Arc<dyn KeySource>) -> Result<Self> {
        let mut config = AppConfig::development(auth_config());
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            connection_timeout: 5,
        };

        let pool = DatabaseManager::connect(&config.database).await?;
        let drinks = DrinkRepository::new(pool);
        drinks.create_schema().await?;

        let verifier = TokenVerifier::new(&config.auth, keys);
        let state = AppState::new(config, drinks, verifier);
        Ok(Self {
            router: drinks_api::app(state.clone()),
            state,
        })
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        authorization: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = authorization {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&body)?))?,
            None => builder.body(Body::empty())?,
        };

        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok((status, value))
    }

    /// Request carrying a valid token with `permissions`
    pub async fn authed(
        &self,
        method: Method,
        uri: &str,
        permissions: &[&str],
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let auth = format!("Bearer {}", TokenBuilder::new().permissions(permissions).sign());
        self.request(method, uri, Some(&auth), body).await
    }
}

/// Mints RS256 tokens shaped like the identity provider's access tokens
pub struct TokenBuilder {
    claims: Value,
    kid: Option<String>,
    key: &'static [u8],
}

impl TokenBuilder {
    pub fn new() -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            claims: json!({
                "sub": "auth0|barista",
                "iss": format!("https://{}/", DOMAIN),
                "aud": AUDIENCE,
                "iat": now,
                "exp": now + 3600,
                "permissions": [],
            }),
            kid: Some(KID.to_string()),
            key: SIGNING_KEY,
        }
    }

    pub fn permissions(mut self, permissions: &[&str]) -> Self {
        self.claims["permissions"] = json!(permissions);
        self
    }

    pub fn claim(mut self, name: &str, value: Value) -> Self {
        self.claims[name] = value;
        self
    }

    pub fn without_claim(mut self, name: &str) -> Self {
        if let Some(map) = self.claims.as_object_mut() {
            map.remove(name);
        }
        self
    }

    pub fn kid(mut self, kid: Option<&str>) -> Self {
        self.kid = kid.map(str::to_string);
        self
    }

    pub fn signed_by_rogue_key(mut self) -> Self {
        self.key = ROGUE_KEY;
        self
    }

    pub fn sign(self) -> String {
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.kid;
        let key = EncodingKey::from_rsa_pem(self.key).expect("fixture key parses");
        encode(&header, &self.claims, &key).expect("token encodes")
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
