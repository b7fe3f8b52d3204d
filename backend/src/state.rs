//! Application state management
//!
//! Shared state handed to every handler through Axum's state extraction.
//! Everything here is built once at startup and is cheap to clone.

use crate::auth::{AuthGate, CookieSettings, JwtService};
use crate::config::AppConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Token issuer/verifier with pre-computed keys
    pub jwt: JwtService,
    pub cookies: Arc<CookieSettings>,
    pub gate: Arc<AuthGate>,
}

impl AppState {
    /// Create a new application state with the default open-endpoint list
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        let jwt = JwtService::new(&config.auth.jwt_secret, config.auth.access_token_expiry_secs);
        let cookies = CookieSettings::from_config(&config.auth);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            cookies: Arc::new(cookies),
            gate: Arc::new(AuthGate::default()),
        }
    }

    #[inline]
    pub fn db(&self) -> &PgPool {
        &self.db
    }

    #[inline]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[inline]
    pub fn jwt(&self) -> &JwtService {
        &self.jwt
    }

    #[inline]
    pub fn cookies(&self) -> &CookieSettings {
        &self.cookies
    }

    #[inline]
    pub fn gate(&self) -> &AuthGate {
        &self.gate
    }
}
