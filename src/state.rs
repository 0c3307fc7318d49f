//! Application context shared by every handler

use std::sync::Arc;

use crate::auth::{KeySetError, TokenVerifier};
use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager, DrinkRepository};
use crate::middleware::RequirePermission;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Keys(#[from] KeySetError),
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub drinks: DrinkRepository,
    pub verifier: Arc<TokenVerifier>,
}

impl AppState {
    pub fn new(config: AppConfig, drinks: DrinkRepository, verifier: TokenVerifier) -> Self {
        Self {
            config: Arc::new(config),
            drinks,
            verifier: Arc::new(verifier),
        }
    }

    /// Connect the pool, ensure the schema exists and set up token verification
    pub async fn from_config(config: AppConfig) -> Result<Self, StartupError> {
        let pool = DatabaseManager::connect(&config.database).await?;
        let drinks = DrinkRepository::new(pool);
        drinks.create_schema().await?;

        let verifier = TokenVerifier::from_config(&config.auth)?;
        Ok(Self::new(config, drinks, verifier))
    }

    /// Guard state for a route needing `permission`
    pub fn require(&self, permission: &'static str) -> RequirePermission {
        RequirePermission::new(self.verifier.clone(), permission)
    }
}
