use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::errors::auth::AuthError;
use crate::services::AuthService;
use crate::types::dto::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse};
use crate::types::dto::common::MessageResponse;
use crate::types::dto::user::UserResponse;

/// Authentication API endpoints
pub struct AuthApi {
    auth_service: Arc<AuthService>,
}

impl AuthApi {
    /// Create a new AuthApi with the given AuthService
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Login with nik and password to receive authentication tokens
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<LoginResponse>, AuthError> {
        let (access_token, refresh_token, user) =
            self.auth_service.login(&body.nik, &body.password).await?;

        let user = UserResponse::from_model(&user)
            .ok_or_else(|| AuthError::internal_error(format!("Corrupt role or status on user {}", user.id)))?;

        Ok(Json(LoginResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_service.token_service().access_expires_in(),
            user,
        }))
    }

    /// Exchange a refresh token for a new access/refresh pair
    ///
    /// The presented refresh token is consumed; reusing it fails with 401.
    #[oai(path = "/refresh", method = "post", tag = "AuthTags::Authentication")]
    async fn refresh(&self, body: Json<RefreshRequest>) -> Result<Json<RefreshResponse>, AuthError> {
        let (access_token, refresh_token) =
            self.auth_service.refresh(&body.refresh_token).await?;

        Ok(Json(RefreshResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: self.auth_service.token_service().access_expires_in(),
        }))
    }

    /// Logout and revoke the current session
    ///
    /// Revokes the presented access token and the refresh token issued with
    /// it; both fail with 401 from this point on.
    #[oai(path = "/logout", method = "post", tag = "AuthTags::Authentication")]
    async fn logout(&self, auth: BearerAuth) -> Result<Json<MessageResponse>, AuthError> {
        let claims = self.auth_service.authenticate(&auth.0.token).await?;

        self.auth_service.logout(&claims).await?;

        Ok(Json(MessageResponse {
            message: "Logged out successfully".to_string(),
        }))
    }

    /// Return the full profile of the authenticated user
    #[oai(path = "/me", method = "get", tag = "AuthTags::Authentication")]
    async fn me(&self, auth: BearerAuth) -> Result<Json<UserResponse>, AuthError> {
        let claims = self.auth_service.authenticate(&auth.0.token).await?;

        let user = self.auth_service.current_user(&claims).await?;

        let profile = UserResponse::from_model(&user)
            .ok_or_else(|| AuthError::internal_error(format!("Corrupt role or status on user {}", user.id)))?;

        Ok(Json(profile))
    }
}
