// Common test utilities for integration tests

use std::sync::Arc;

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};

use kantin_backend::services::{AuthService, TokenService, UserService};
use kantin_backend::stores::user_store::NewUser;
use kantin_backend::stores::{AuditStore, SessionStore, UserStore};
use kantin_backend::types::db::user;
use kantin_backend::types::internal::auth::Role;

/// A fully wired backend over an in-memory database
pub struct TestBackend {
    pub db: DatabaseConnection,
    pub user_store: Arc<UserStore>,
    pub session_store: Arc<SessionStore>,
    pub audit_store: Arc<AuditStore>,
    pub token_service: Arc<TokenService>,
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
}

/// Creates a test database with migrations applied and wires every store
/// and service on top of it
pub async fn setup_backend() -> TestBackend {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let user_store = Arc::new(UserStore::new(
        db.clone(),
        "integration-test-pepper".to_string(),
    ));
    let session_store = Arc::new(SessionStore::new(db.clone()));
    let audit_store = Arc::new(AuditStore::new(db.clone()));
    let token_service = Arc::new(TokenService::new(
        "integration-test-secret-32-characters-min".to_string(),
        "integration-refresh-secret-32-chars-min".to_string(),
        15,
        7,
    ));

    let auth_service = Arc::new(AuthService::new(
        user_store.clone(),
        session_store.clone(),
        token_service.clone(),
        audit_store.clone(),
    ));
    let user_service = Arc::new(UserService::new(user_store.clone(), audit_store.clone()));

    TestBackend {
        db,
        user_store,
        session_store,
        audit_store,
        token_service,
        auth_service,
        user_service,
    }
}

/// Seed a user directly through the store
pub async fn seed_user(
    backend: &TestBackend,
    nik: &str,
    username: &str,
    password: &str,
    role: Role,
) -> user::Model {
    backend
        .user_store
        .create(NewUser {
            nik: nik.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            role,
            full_name: format!("Seeded {}", username),
            email: None,
            phone: None,
            department_id: None,
        })
        .await
        .expect("Failed to seed user")
}
