use poem_openapi::{param::Path, payload::Json, ApiResponse, OpenApi, Tags};
use std::sync::Arc;

use crate::api::auth::BearerAuth;
use crate::errors::user::UserError;
use crate::services::{AuthService, UserService};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::{
    CreateUserRequest, ResetPasswordRequest, ResetPasswordResponse, UpdateProfileRequest,
    UpdateProfileResponse, UpdateRoleRequest, UpdateStatusRequest, UserResponse,
    UsersListResponse,
};
use crate::types::internal::auth::Claims;

/// User administration API endpoints
pub struct UsersApi {
    auth_service: Arc<AuthService>,
    user_service: Arc<UserService>,
}

impl UsersApi {
    /// Create a new UsersApi with the given AuthService and UserService
    pub fn new(auth_service: Arc<AuthService>, user_service: Arc<UserService>) -> Self {
        Self {
            auth_service,
            user_service,
        }
    }

    /// Establish the requester identity; token failures become 401 here,
    /// role checks happen in the service
    async fn requester(&self, auth: &BearerAuth) -> Result<Claims, UserError> {
        Ok(self.auth_service.authenticate(&auth.0.token).await?)
    }
}

/// API tags for user administration endpoints
#[derive(Tags)]
enum UserTags {
    /// User administration
    Users,
}

/// API response for user creation
#[derive(ApiResponse)]
pub enum CreateUserApiResponse {
    /// User created
    #[oai(status = 201)]
    Created(Json<UserResponse>),
}

#[OpenApi]
impl UsersApi {
    /// Create a new user (administrators only)
    #[oai(path = "/users", method = "post", tag = "UserTags::Users")]
    async fn create(
        &self,
        auth: BearerAuth,
        body: Json<CreateUserRequest>,
    ) -> Result<CreateUserApiResponse, UserError> {
        let requester = self.requester(&auth).await?;

        let created = self.user_service.create(&requester, body.0).await?;

        Ok(CreateUserApiResponse::Created(Json(created)))
    }

    /// List all users
    #[oai(path = "/users", method = "get", tag = "UserTags::Users")]
    async fn list(&self, auth: BearerAuth) -> Result<Json<UsersListResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let users = self.user_service.list(&requester).await?;

        Ok(Json(UsersListResponse { users }))
    }

    /// Fetch a single user by id
    #[oai(path = "/users/:id", method = "get", tag = "UserTags::Users")]
    async fn get(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<UserResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let user = self.user_service.get(&requester, &id.0).await?;

        Ok(Json(user))
    }

    /// Transition a user to a new status
    #[oai(path = "/users/:id/status", method = "patch", tag = "UserTags::Users")]
    async fn update_status(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateStatusRequest>,
    ) -> Result<Json<UserResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let updated = self
            .user_service
            .update_status(&requester, &id.0, body.0.status)
            .await?;

        Ok(Json(updated))
    }

    /// Transition a user to a new role
    #[oai(path = "/users/:id/role", method = "patch", tag = "UserTags::Users")]
    async fn update_role(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateRoleRequest>,
    ) -> Result<Json<UserResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let updated = self
            .user_service
            .update_role(&requester, &id.0, body.0.role)
            .await?;

        Ok(Json(updated))
    }

    /// Reset a user's password, generating a temporary one when none is given
    #[oai(path = "/users/:id/reset-password", method = "post", tag = "UserTags::Users")]
    async fn reset_password(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<ResetPasswordRequest>,
    ) -> Result<Json<ResetPasswordResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let response = self
            .user_service
            .reset_password(&requester, &id.0, body.0.new_password)
            .await?;

        Ok(Json(response))
    }

    /// Apply a partial profile update; the response echoes the changed fields
    #[oai(path = "/users/:id/profile", method = "patch", tag = "UserTags::Users")]
    async fn update_profile(
        &self,
        auth: BearerAuth,
        id: Path<String>,
        body: Json<UpdateProfileRequest>,
    ) -> Result<Json<UpdateProfileResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let response = self
            .user_service
            .update_profile(&requester, &id.0, body.0)
            .await?;

        Ok(Json(response))
    }

    /// Delete a user
    #[oai(path = "/users/:id", method = "delete", tag = "UserTags::Users")]
    async fn delete(
        &self,
        auth: BearerAuth,
        id: Path<String>,
    ) -> Result<Json<MessageResponse>, UserError> {
        let requester = self.requester(&auth).await?;

        let response = self.user_service.delete(&requester, &id.0).await?;

        Ok(Json(response))
    }
}
