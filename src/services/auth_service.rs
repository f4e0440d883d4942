use std::sync::Arc;

use crate::errors::auth::AuthError;
use crate::services::TokenService;
use crate::stores::audit_store::actions;
use crate::stores::session_store::NewSession;
use crate::stores::{AuditStore, SessionStore, UserStore};
use crate::types::db::user;
use crate::types::internal::auth::{Claims, UserStatus};

/// Authentication service that orchestrates login, refresh, and logout flows
///
/// Coordinates UserStore, SessionStore, TokenService, and AuditStore so the
/// API layer only deals in requests and responses. Audit writes are
/// best-effort and never fail the surrounding flow.
pub struct AuthService {
    user_store: Arc<UserStore>,
    session_store: Arc<SessionStore>,
    token_service: Arc<TokenService>,
    audit_store: Arc<AuditStore>,
}

impl AuthService {
    /// Create a new AuthService
    pub fn new(
        user_store: Arc<UserStore>,
        session_store: Arc<SessionStore>,
        token_service: Arc<TokenService>,
        audit_store: Arc<AuditStore>,
    ) -> Self {
        Self {
            user_store,
            session_store,
            token_service,
            audit_store,
        }
    }

    /// Get a reference to the TokenService
    ///
    /// Useful for the API layer when it needs token metadata for responses
    pub fn token_service(&self) -> Arc<TokenService> {
        self.token_service.clone()
    }

    /// Perform a complete login flow with audit logging
    ///
    /// # Arguments
    /// * `nik` - Employee identifier used as the login name
    /// * `password` - Password to verify
    ///
    /// # Returns
    /// * `Ok((access_token, refresh_token, user))` on success
    /// * `Err(AuthError)` - Uniform InvalidCredentials for every bad input
    pub async fn login(
        &self,
        nik: &str,
        password: &str,
    ) -> Result<(String, String, user::Model), AuthError> {
        let user = match self.user_store.verify_credentials(nik, password).await {
            Ok(user) => user,
            Err(err) => {
                if let Err(audit_err) = self
                    .audit_store
                    .record(
                        None,
                        actions::LOGIN_FAILURE,
                        format!("Failed login for nik {}: invalid credentials or inactive user", nik),
                    )
                    .await
                {
                    tracing::warn!("Failed to record login failure: {}", audit_err);
                }
                return Err(err);
            }
        };

        let (access_token, refresh_token) = self.issue_session(&user).await?;

        if let Err(audit_err) = self
            .audit_store
            .record(
                Some(&user.id),
                actions::LOGIN_SUCCESS,
                format!("User {} logged in", user.nik),
            )
            .await
        {
            tracing::warn!("Failed to record login success: {}", audit_err);
        }

        Ok((access_token, refresh_token, user))
    }

    /// Mint an access/refresh pair for a verified user and register the session
    async fn issue_session(&self, user: &user::Model) -> Result<(String, String), AuthError> {
        let (access_token, jti) = self.token_service.generate_access_token(user)?;

        let refresh_token = self.token_service.generate_refresh_token();
        let token_hash = self.token_service.hash_refresh_token(&refresh_token);
        let expires_at = self.token_service.refresh_expiration();

        self.session_store
            .register(NewSession {
                token_hash,
                user_id: user.id.clone(),
                access_token_id: jti,
                expires_at,
            })
            .await?;

        Ok((access_token, refresh_token))
    }

    /// Exchange a refresh token for a brand-new access/refresh pair
    ///
    /// The presented token is consumed by the rotation: using it a second
    /// time fails, as does presenting it after its owner was deleted or
    /// taken off ACTIVE status. Either the whole exchange happens or none
    /// of it does.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(String, String), AuthError> {
        let token_hash = self.token_service.hash_refresh_token(refresh_token);

        let session = self.session_store.find_session(&token_hash).await?;

        let user = self
            .user_store
            .find_by_id(&session.user_id)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to load user: {}", e)))?
            .ok_or_else(AuthError::invalid_refresh_token)?;

        // The owner must still be a valid, active account
        if UserStatus::parse(&user.status) != Some(UserStatus::Active) {
            return Err(AuthError::invalid_refresh_token());
        }

        let (access_token, jti) = self.token_service.generate_access_token(&user)?;

        let new_refresh_token = self.token_service.generate_refresh_token();
        let new_hash = self.token_service.hash_refresh_token(&new_refresh_token);
        let expires_at = self.token_service.refresh_expiration();

        self.session_store
            .rotate(
                &token_hash,
                NewSession {
                    token_hash: new_hash,
                    user_id: user.id.clone(),
                    access_token_id: jti,
                    expires_at,
                },
            )
            .await?;

        Ok((access_token, new_refresh_token))
    }

    /// Revoke the session behind a validated access token (logout)
    ///
    /// After this returns, the access token fails every bearer check and the
    /// refresh token issued with it fails every refresh attempt.
    pub async fn logout(&self, claims: &Claims) -> Result<(), AuthError> {
        self.session_store
            .revoke_session(&claims.jti, claims.exp)
            .await?;

        if let Err(audit_err) = self
            .audit_store
            .record(
                Some(&claims.sub),
                actions::LOGOUT,
                format!("User {} logged out", claims.nik),
            )
            .await
        {
            tracing::warn!("Failed to record logout: {}", audit_err);
        }

        Ok(())
    }

    /// Establish the identity behind a bearer token
    ///
    /// Signature and expiry come from the token itself; revocation comes
    /// from the Session Registry. Every protected endpoint goes through
    /// here, so a logged-out token is rejected everywhere.
    pub async fn authenticate(&self, token: &str) -> Result<Claims, AuthError> {
        let claims = self.token_service.validate_access_token(token)?;

        if self.session_store.is_access_revoked(&claims.jti).await? {
            return Err(AuthError::revoked_token());
        }

        Ok(claims)
    }

    /// Load the full user record behind validated claims
    ///
    /// Fails 401 when the account has been deleted since the token was
    /// issued.
    pub async fn current_user(&self, claims: &Claims) -> Result<user::Model, AuthError> {
        self.user_store
            .find_by_id(&claims.sub)
            .await
            .map_err(|e| AuthError::internal_error(format!("Failed to load user: {}", e)))?
            .ok_or_else(AuthError::invalid_token)
    }
}
