use std::sync::Arc;
use uuid::Uuid;

use crate::errors::user::UserError;
use crate::services::rbac::{self, UserOperation};
use crate::services::crypto;
use crate::stores::audit_store::actions;
use crate::stores::user_store::{NewUser, ProfileChanges};
use crate::stores::{AuditStore, UserStore};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{
    CreateUserRequest, ResetPasswordResponse, UpdateProfileRequest, UpdateProfileResponse,
    UserResponse,
};
use crate::types::internal::auth::{Claims, Role, UserStatus};

/// User lifecycle manager
///
/// Every operation authorizes the requester first, then touches the store,
/// then writes an audit event. A denial or validation failure never reaches
/// storage.
pub struct UserService {
    user_store: Arc<UserStore>,
    audit_store: Arc<AuditStore>,
}

impl UserService {
    /// Create a new UserService
    pub fn new(user_store: Arc<UserStore>, audit_store: Arc<AuditStore>) -> Self {
        Self {
            user_store,
            audit_store,
        }
    }

    /// Resolve a path id parameter
    ///
    /// Ids are UUID strings; anything that does not parse cannot name a row
    /// and is reported as NotFound.
    fn parse_id(id: &str) -> Result<(), UserError> {
        Uuid::parse_str(id).map_err(|_| UserError::not_found())?;
        Ok(())
    }

    async fn audit(&self, requester: &Claims, action: &str, detail: String) {
        if let Err(audit_err) = self
            .audit_store
            .record(Some(&requester.sub), action, detail)
            .await
        {
            tracing::warn!("Failed to record audit event {}: {}", action, audit_err);
        }
    }

    fn to_response(user: &crate::types::db::user::Model) -> Result<UserResponse, UserError> {
        UserResponse::from_model(user).ok_or_else(|| {
            UserError::internal_error(format!("Corrupt role or status on user {}", user.id))
        })
    }

    /// Create a new user
    pub async fn create(
        &self,
        requester: &Claims,
        request: CreateUserRequest,
    ) -> Result<UserResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::Create)?;

        if request.nik.trim().is_empty()
            || request.username.trim().is_empty()
            || request.password.is_empty()
        {
            return Err(UserError::bad_request(
                "nik, username, and password are required".to_string(),
            ));
        }

        let created = self
            .user_store
            .create(NewUser {
                nik: request.nik,
                username: request.username,
                password: request.password,
                role: request.role,
                full_name: request.full_name.unwrap_or_default(),
                email: request.email,
                phone: request.phone,
                department_id: request.department_id,
            })
            .await?;

        self.audit(
            requester,
            actions::USER_CREATED,
            format!("Admin {} created user {}", requester.nik, created.nik),
        )
        .await;

        tracing::info!("User {} created by {}", created.nik, requester.nik);

        Self::to_response(&created)
    }

    /// List all users in stable creation order
    pub async fn list(&self, requester: &Claims) -> Result<Vec<UserResponse>, UserError> {
        rbac::authorize(requester.role, UserOperation::List)?;

        let users = self.user_store.find_all().await?;

        users.iter().map(Self::to_response).collect()
    }

    /// Fetch a single user by id
    pub async fn get(&self, requester: &Claims, id: &str) -> Result<UserResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::Get)?;
        Self::parse_id(id)?;

        let user = self
            .user_store
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;

        Self::to_response(&user)
    }

    /// Transition a user to a new status
    pub async fn update_status(
        &self,
        requester: &Claims,
        id: &str,
        status: UserStatus,
    ) -> Result<UserResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::UpdateStatus)?;
        Self::parse_id(id)?;

        let updated = self.user_store.update_status(id, status).await?;

        self.audit(
            requester,
            actions::USER_STATUS_CHANGED,
            format!(
                "Admin {} set status of user {} to {}",
                requester.nik, updated.nik, status
            ),
        )
        .await;

        Self::to_response(&updated)
    }

    /// Transition a user to a new role
    pub async fn update_role(
        &self,
        requester: &Claims,
        id: &str,
        role: Role,
    ) -> Result<UserResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::UpdateRole)?;
        Self::parse_id(id)?;

        let updated = self.user_store.update_role(id, role).await?;

        self.audit(
            requester,
            actions::USER_ROLE_CHANGED,
            format!(
                "Admin {} changed role of user {} to {}",
                requester.nik, updated.nik, role
            ),
        )
        .await;

        tracing::info!(
            "Role of user {} changed to {} by {}",
            updated.nik,
            role,
            requester.nik
        );

        Self::to_response(&updated)
    }

    /// Reset a user's password
    ///
    /// Uses the supplied password when present, otherwise generates a
    /// temporary one and returns it to the administrator. Existing sessions
    /// are left untouched.
    pub async fn reset_password(
        &self,
        requester: &Claims,
        id: &str,
        new_password: Option<String>,
    ) -> Result<ResetPasswordResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::ResetPassword)?;
        Self::parse_id(id)?;

        let target = self
            .user_store
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;

        if let Some(password) = &new_password {
            if password.is_empty() {
                return Err(UserError::bad_request(
                    "newPassword must not be empty".to_string(),
                ));
            }
        }

        let (password, temp_password) = match new_password {
            Some(password) => (password, None),
            None => {
                let generated = crypto::generate_temp_password();
                (generated.clone(), Some(generated))
            }
        };

        self.user_store.set_password(id, &password).await?;

        self.audit(
            requester,
            actions::PASSWORD_RESET,
            format!("Admin {} reset password of user {}", requester.nik, target.nik),
        )
        .await;

        Ok(ResetPasswordResponse {
            message: "Password reset successfully".to_string(),
            temp_password,
        })
    }

    /// Apply a partial profile update
    ///
    /// The response echoes exactly the fields that changed, with their new
    /// values.
    pub async fn update_profile(
        &self,
        requester: &Claims,
        id: &str,
        request: UpdateProfileRequest,
    ) -> Result<UpdateProfileResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::UpdateProfile)?;
        Self::parse_id(id)?;

        if let Some(username) = &request.username {
            if username.trim().is_empty() {
                return Err(UserError::bad_request(
                    "username must not be empty".to_string(),
                ));
            }
        }

        let changes = ProfileChanges {
            username: request.username,
            full_name: request.full_name,
            email: request.email,
            phone: request.phone,
        };

        if changes.is_empty() {
            return Err(UserError::bad_request(
                "No profile fields provided".to_string(),
            ));
        }

        let updated = self.user_store.update_profile(id, &changes).await?;

        self.audit(
            requester,
            actions::USER_PROFILE_UPDATED,
            format!("Admin {} updated profile of user {}", requester.nik, updated.nik),
        )
        .await;

        Ok(UpdateProfileResponse {
            id: updated.id.clone(),
            username: changes.username.map(|_| updated.username.clone()),
            full_name: changes.full_name.map(|_| updated.full_name.clone()),
            email: changes.email.and(updated.email.clone()),
            phone: changes.phone.and(updated.phone.clone()),
        })
    }

    /// Delete a user
    pub async fn delete(&self, requester: &Claims, id: &str) -> Result<MessageResponse, UserError> {
        rbac::authorize(requester.role, UserOperation::Delete)?;
        Self::parse_id(id)?;

        let target = self
            .user_store
            .find_by_id(id)
            .await?
            .ok_or_else(UserError::not_found)?;

        self.user_store.delete(id).await?;

        self.audit(
            requester,
            actions::USER_DELETED,
            format!("Admin {} deleted user {}", requester.nik, target.nik),
        )
        .await;

        Ok(MessageResponse {
            message: "User deleted successfully".to_string(),
        })
    }
}
