use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

/// Identity provider settings used to verify bearer tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub domain: String,
    pub audience: String,
    pub issuer: String,
    pub jwks_url: String,
    /// Local key set file; takes precedence over `jwks_url` when set.
    pub jwks_path: Option<PathBuf>,
    /// 0 fetches the key set on every validation.
    pub jwks_cache_ttl_secs: u64,
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Empty means any origin.
    pub cors_origins: Vec<String>,
}

impl Environment {
    /// `APP_ENV=production` (or `prod`); anything else is development
    pub fn from_env() -> Self {
        match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl DatabaseConfig {
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Development => Self {
                url: "sqlite://database.db".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            Environment::Production => Self {
                url: "sqlite://database.db".to_string(),
                max_connections: 10,
                connection_timeout: 5,
            },
        }
    }

    /// Database settings alone, for commands that never verify tokens.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::for_environment(Environment::from_env()).with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = env::var("DATABASE_URL") {
            self.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.max_connections = parse("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", v)?;
        }
        Ok(self)
    }
}

impl AuthConfig {
    /// Derive issuer and key set location from an Auth0-style tenant domain.
    pub fn for_domain(domain: impl Into<String>, audience: impl Into<String>) -> Self {
        let domain = domain.into();
        let host = domain.trim_end_matches('/');
        Self {
            issuer: format!("https://{}/", host),
            jwks_url: format!("https://{}/.well-known/jwks.json", host),
            domain,
            audience: audience.into(),
            jwks_path: None,
            jwks_cache_ttl_secs: 600,
            leeway_secs: 0,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        let domain = env::var("AUTH0_DOMAIN").map_err(|_| ConfigError::Missing("AUTH0_DOMAIN"))?;
        let audience = env::var("API_AUDIENCE").map_err(|_| ConfigError::Missing("API_AUDIENCE"))?;
        let auth = AuthConfig::for_domain(domain, audience);

        match environment {
            Environment::Production => Self::production(auth),
            Environment::Development => Self::development(auth),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        self.database = self.database.with_env_overrides()?;

        // Auth overrides
        if let Ok(v) = env::var("AUTH_ISSUER") {
            self.auth.issuer = v;
        }
        if let Ok(v) = env::var("AUTH_JWKS_URL") {
            self.auth.jwks_url = v;
        }
        if let Ok(v) = env::var("AUTH_JWKS_PATH") {
            self.auth.jwks_path = Some(PathBuf::from(v));
        }
        if let Ok(v) = env::var("AUTH_JWKS_CACHE_TTL_SECS") {
            self.auth.jwks_cache_ttl_secs = parse("AUTH_JWKS_CACHE_TTL_SECS", v)?;
        }
        if let Ok(v) = env::var("AUTH_LEEWAY_SECS") {
            self.auth.leeway_secs = parse("AUTH_LEEWAY_SECS", v)?;
        }

        // API overrides
        if let Some(v) = env::var("API_PORT").ok().or_else(|| env::var("PORT").ok()) {
            self.api.port = parse("API_PORT", v)?;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = parse("API_ENABLE_REQUEST_LOGGING", v)?;
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = parse("API_MAX_REQUEST_SIZE_BYTES", v)?;
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    pub fn development(auth: AuthConfig) -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig::for_environment(Environment::Development),
            auth,
            api: ApiConfig {
                port: 5000,
                enable_request_logging: true,
                max_request_size_bytes: 1024 * 1024, // 1MB
            },
            security: SecurityConfig {
                cors_origins: Vec::new(),
            },
        }
    }

    pub fn production(auth: AuthConfig) -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig::for_environment(Environment::Production),
            auth: AuthConfig {
                jwks_cache_ttl_secs: 3600,
                ..auth
            },
            api: ApiConfig {
                port: 8080,
                enable_request_logging: false,
                max_request_size_bytes: 64 * 1024,
            },
            security: SecurityConfig {
                cors_origins: vec!["http://localhost:8100".to_string()],
            },
        }
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_issuer_and_jwks_url_from_domain() {
        let auth = AuthConfig::for_domain("fsnd.us.auth0.com", "drinks");
        assert_eq!(auth.issuer, "https://fsnd.us.auth0.com/");
        assert_eq!(auth.jwks_url, "https://fsnd.us.auth0.com/.well-known/jwks.json");
        assert_eq!(auth.audience, "drinks");
    }

    #[test]
    fn trailing_slash_in_domain_is_ignored() {
        let auth = AuthConfig::for_domain("tenant.auth0.com/", "drinks");
        assert_eq!(auth.issuer, "https://tenant.auth0.com/");
    }

    #[test]
    fn production_caches_key_set_longer() {
        let auth = AuthConfig::for_domain("tenant.auth0.com", "drinks");
        let dev = AppConfig::development(auth.clone());
        let prod = AppConfig::production(auth);
        assert!(prod.auth.jwks_cache_ttl_secs > dev.auth.jwks_cache_ttl_secs);
        assert!(!prod.api.enable_request_logging);
    }

    #[test]
    fn database_settings_load_without_auth_settings() {
        // AUTH0_DOMAIN and API_AUDIENCE are never read here
        let database = DatabaseConfig::from_env().unwrap();
        assert!(!database.url.is_empty());
        assert!(database.max_connections > 0);
    }

    #[test]
    fn presets_share_the_database_defaults() {
        let auth = AuthConfig::for_domain("tenant.auth0.com", "drinks");
        let prod = AppConfig::production(auth);
        let expected = DatabaseConfig::for_environment(Environment::Production);
        assert_eq!(prod.database.max_connections, expected.max_connections);
        assert_eq!(prod.database.connection_timeout, expected.connection_timeout);
    }

    #[test]
    fn rejects_unparsable_numbers() {
        let err = parse::<u32>("DATABASE_MAX_CONNECTIONS", "many".to_string()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { name: "DATABASE_MAX_CONNECTIONS", .. }));
    }
}
