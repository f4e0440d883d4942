use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::dto::user::UserResponse;

/// Request model for user login
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Employee identifier used as the login name
    pub nik: String,

    /// Password for authentication
    pub password: String,
}

/// Response model containing authentication tokens and the logged-in user
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct LoginResponse {
    /// JWT access token for API authentication
    pub access_token: String,

    /// Refresh token for obtaining new token pairs
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,

    /// The authenticated user, without credentials
    pub user: UserResponse,
}

/// Request model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct RefreshRequest {
    /// Refresh token to exchange for a new token pair
    pub refresh_token: String,
}

/// Response model for token refresh
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct RefreshResponse {
    /// New JWT access token
    pub access_token: String,

    /// New refresh token; the presented one is no longer valid
    pub refresh_token: String,

    /// Token type (always "Bearer")
    pub token_type: String,

    /// Number of seconds until the access token expires
    pub expires_in: i64,
}
