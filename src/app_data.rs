use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppSettings;
use crate::services::{AuthService, TokenService, UserService};
use crate::stores::{AuditStore, SessionStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once in main.rs and shared across the API
/// layer. Stores come first, services on top of them.
pub struct AppData {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub session_store: Arc<SessionStore>,
    pub audit_store: Arc<AuditStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

impl AppData {
    /// Initialize all application data
    ///
    /// The database connection should be established and migrated before
    /// calling this.
    pub fn init(db: DatabaseConnection, settings: &AppSettings) -> Self {
        tracing::info!("Initializing AppData...");

        tracing::debug!("Creating stores...");
        let user_store = Arc::new(UserStore::new(
            db.clone(),
            settings.password_pepper.clone(),
        ));
        let session_store = Arc::new(SessionStore::new(db.clone()));
        let audit_store = Arc::new(AuditStore::new(db.clone()));

        tracing::debug!("Creating services...");
        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret.clone(),
            settings.refresh_token_secret.clone(),
            settings.access_token_minutes,
            settings.refresh_token_days,
        ));

        let auth_service = Arc::new(AuthService::new(
            user_store.clone(),
            session_store.clone(),
            token_service.clone(),
            audit_store.clone(),
        ));

        let user_service = Arc::new(UserService::new(
            user_store.clone(),
            audit_store.clone(),
        ));

        tracing::info!("AppData initialization complete");

        Self {
            db,
            user_store,
            session_store,
            audit_store,
            token_service,
            auth_service,
            user_service,
        }
    }
}
