use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use crate::errors::auth::AuthError;
use crate::types::db::refresh_token::{self, Entity as RefreshToken};
use crate::types::db::revoked_token::{self, Entity as RevokedToken};

/// A refresh-token registration: the hashed token plus the identity of the
/// access token minted with it.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub token_hash: String,
    pub user_id: String,
    pub access_token_id: String,
    pub expires_at: i64,
}

/// SessionStore tracks outstanding refresh tokens and revoked access tokens
///
/// This is the only shared mutable state behind refresh rotation and logout;
/// its operations are transactional so a refresh token can never be used
/// twice and a revoked access token is rejected by every later check.
pub struct SessionStore {
    db: DatabaseConnection,
}

impl SessionStore {
    /// Create a new SessionStore with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a refresh token issued at login
    pub async fn register(&self, session: NewSession) -> Result<(), AuthError> {
        let model = refresh_token::ActiveModel {
            token_hash: Set(session.token_hash),
            user_id: Set(session.user_id),
            access_token_id: Set(session.access_token_id),
            issued_at: Set(Utc::now().timestamp()),
            expires_at: Set(session.expires_at),
        };

        model
            .insert(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to store refresh token: {}", e)))?;

        Ok(())
    }

    /// Look up a refresh token by hash, checking expiry
    ///
    /// # Returns
    /// * `Ok(refresh_token::Model)` - The live session row
    /// * `Err(AuthError)` - InvalidRefreshToken if unknown, ExpiredRefreshToken if past expiry
    pub async fn find_session(&self, token_hash: &str) -> Result<refresh_token::Model, AuthError> {
        let token = RefreshToken::find()
            .filter(refresh_token::Column::TokenHash.eq(token_hash))
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?
            .ok_or_else(AuthError::invalid_refresh_token)?;

        if token.expires_at < Utc::now().timestamp() {
            return Err(AuthError::expired_refresh_token());
        }

        Ok(token)
    }

    /// Atomically replace a refresh token with its successor
    ///
    /// One transaction deletes the old row and inserts the new one. The
    /// delete is guarded by a rows-affected check, so of two concurrent
    /// rotations of the same token exactly one succeeds; the other observes
    /// zero deleted rows and fails without inserting anything. The old token
    /// stops being valid at the same commit that makes the new one valid.
    pub async fn rotate(&self, old_hash: &str, replacement: NewSession) -> Result<(), AuthError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to start transaction: {}", e)))?;

        let now = Utc::now().timestamp();

        let deleted = RefreshToken::delete_many()
            .filter(refresh_token::Column::TokenHash.eq(old_hash))
            .filter(refresh_token::Column::ExpiresAt.gt(now))
            .exec(&txn)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to rotate refresh token: {}", e)))?;

        if deleted.rows_affected == 0 {
            // Unknown, expired, or already rotated away
            txn.rollback().await.ok();
            return Err(AuthError::invalid_refresh_token());
        }

        let model = refresh_token::ActiveModel {
            token_hash: Set(replacement.token_hash),
            user_id: Set(replacement.user_id),
            access_token_id: Set(replacement.access_token_id),
            issued_at: Set(now),
            expires_at: Set(replacement.expires_at),
        };

        model
            .insert(&txn)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to store rotated token: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to commit rotation: {}", e)))?;

        Ok(())
    }

    /// Revoke the session identified by an access token id (logout)
    ///
    /// Adds the jti to the revocation set and removes the refresh token(s)
    /// issued with it, in one transaction. Safe to call twice for the same
    /// jti.
    pub async fn revoke_session(
        &self,
        access_token_id: &str,
        token_expires_at: i64,
    ) -> Result<(), AuthError> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to start transaction: {}", e)))?;

        let model = revoked_token::ActiveModel {
            token_id: Set(access_token_id.to_string()),
            expires_at: Set(token_expires_at),
        };

        if let Err(e) = model.insert(&txn).await {
            // Already in the revocation set; revocation is idempotent
            if !e.to_string().contains("UNIQUE") {
                txn.rollback().await.ok();
                return Err(AuthError::internal_error(format!(
                    "Failed to revoke access token: {}",
                    e
                )));
            }
        }

        RefreshToken::delete_many()
            .filter(refresh_token::Column::AccessTokenId.eq(access_token_id))
            .exec(&txn)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to revoke refresh token: {}", e)))?;

        txn.commit()
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to commit revocation: {}", e)))?;

        Ok(())
    }

    /// Check whether an access token id has been revoked
    pub async fn is_access_revoked(&self, access_token_id: &str) -> Result<bool, AuthError> {
        let revoked = RevokedToken::find_by_id(access_token_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Database error: {}", e)))?;

        Ok(revoked.is_some())
    }

    /// Remove refresh tokens and revocation entries past their natural expiry
    ///
    /// An expired access token already fails signature validation, so its
    /// revocation entry carries no information once expires_at has passed.
    ///
    /// # Returns
    /// * `Ok(u64)` - Number of rows removed
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let now = Utc::now().timestamp();

        let refresh = RefreshToken::delete_many()
            .filter(refresh_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to purge refresh tokens: {}", e)))?;

        let revoked = RevokedToken::delete_many()
            .filter(revoked_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to purge revoked tokens: {}", e)))?;

        Ok(refresh.rows_affected + revoked.rows_affected)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("db", &"<connection>")
            .finish()
    }
}
