use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

use crate::types::db::audit_event;

/// Audit action names written by the services
pub mod actions {
    pub const LOGIN_SUCCESS: &str = "LOGIN_SUCCESS";
    pub const LOGIN_FAILURE: &str = "LOGIN_FAILURE";
    pub const LOGOUT: &str = "LOGOUT";
    pub const USER_CREATED: &str = "USER_CREATED";
    pub const USER_STATUS_CHANGED: &str = "USER_STATUS_CHANGED";
    pub const USER_ROLE_CHANGED: &str = "USER_ROLE_CHANGED";
    pub const PASSWORD_RESET: &str = "PASSWORD_RESET";
    pub const USER_PROFILE_UPDATED: &str = "USER_PROFILE_UPDATED";
    pub const USER_DELETED: &str = "USER_DELETED";
}

/// Repository for audit event storage
///
/// Writes are best-effort: callers log a failure and carry on, so an audit
/// outage never fails the request being audited.
pub struct AuditStore {
    db: DatabaseConnection,
}

impl AuditStore {
    /// Create a new AuditStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Write an audit event
    ///
    /// # Arguments
    /// * `user_id` - Acting or affected user, when one could be resolved
    /// * `action` - One of the `actions` constants
    /// * `detail` - Human-readable context
    pub async fn record(
        &self,
        user_id: Option<&str>,
        action: &str,
        detail: impl Into<String>,
    ) -> Result<(), sea_orm::DbErr> {
        let event = audit_event::ActiveModel {
            id: sea_orm::ActiveValue::NotSet, // Auto-increment
            user_id: Set(user_id.map(|s| s.to_string())),
            action: Set(action.to_string()),
            detail: Set(detail.into()),
            created_at: Set(Utc::now().timestamp()),
        };

        event.insert(&self.db).await?;

        Ok(())
    }
}

impl std::fmt::Debug for AuditStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditStore")
            .field("db", &"<connection>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, EntityTrait};

    use crate::types::db::audit_event::Entity as AuditEvent;

    async fn setup() -> (sea_orm::DatabaseConnection, AuditStore) {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to create test database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        (db.clone(), AuditStore::new(db))
    }

    #[tokio::test]
    async fn test_record_inserts_event_row() {
        let (db, store) = setup().await;

        store
            .record(Some("user-1"), actions::LOGIN_SUCCESS, "login from test")
            .await
            .unwrap();

        let events = AuditEvent::find().all(&db).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].user_id.as_deref(), Some("user-1"));
        assert_eq!(events[0].action, actions::LOGIN_SUCCESS);
        assert_eq!(events[0].detail, "login from test");
        assert!(events[0].created_at > 0);
    }

    #[tokio::test]
    async fn test_record_accepts_missing_user() {
        let (db, store) = setup().await;

        store
            .record(None, actions::LOGIN_FAILURE, "unknown nik 000")
            .await
            .unwrap();

        let events = AuditEvent::find().all(&db).await.unwrap();
        assert_eq!(events.len(), 1);
        assert!(events[0].user_id.is_none());
    }
}
