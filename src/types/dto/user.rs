use poem_openapi::Object;
use serde::{Deserialize, Serialize};

use crate::types::db::user;
use crate::types::internal::auth::{Role, UserStatus};

/// User record as exposed to clients. Credentials never appear here.
#[derive(Object, Debug, Clone, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct UserResponse {
    /// Opaque unique identifier
    pub id: String,

    /// Employee identifier (login name)
    pub nik: String,

    /// Display username
    pub username: String,

    /// Access role
    pub role: Role,

    /// Account status
    pub status: UserStatus,

    /// Full name of the staff member
    pub full_name: String,

    /// Contact email
    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,

    /// Contact phone number
    #[oai(skip_serializing_if_is_none)]
    pub phone: Option<String>,

    /// Opaque department reference
    #[oai(skip_serializing_if_is_none)]
    pub department_id: Option<String>,

    /// Creation time (Unix timestamp)
    pub created_at: i64,

    /// Last modification time (Unix timestamp)
    pub updated_at: i64,
}

impl UserResponse {
    /// Map a database row to the client view.
    ///
    /// Returns None when the stored role or status string falls outside the
    /// closed enumerations, which only happens on corrupt data.
    pub fn from_model(user: &user::Model) -> Option<Self> {
        Some(Self {
            id: user.id.clone(),
            nik: user.nik.clone(),
            username: user.username.clone(),
            role: Role::parse(&user.role)?,
            status: UserStatus::parse(&user.status)?,
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            department_id: user.department_id.clone(),
            created_at: user.created_at,
            updated_at: user.updated_at,
        })
    }
}

/// Request model for user creation
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Employee identifier; unique, immutable once created
    pub nik: String,

    /// Display username; unique
    pub username: String,

    /// Initial password (stored only as a hash)
    pub password: String,

    /// Access role
    pub role: Role,

    /// Full name of the staff member
    #[oai(skip_serializing_if_is_none)]
    pub full_name: Option<String>,

    /// Contact email
    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,

    /// Contact phone number
    #[oai(skip_serializing_if_is_none)]
    pub phone: Option<String>,

    /// Opaque department reference
    #[oai(skip_serializing_if_is_none)]
    pub department_id: Option<String>,
}

/// Response model for user listing
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct UsersListResponse {
    /// All users, ordered by creation time then id
    pub users: Vec<UserResponse>,
}

/// Request model for a status transition
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// New account status
    pub status: UserStatus,
}

/// Request model for a role transition
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct UpdateRoleRequest {
    /// New access role
    pub role: Role,
}

/// Request model for an administrative password reset
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// New password; a temporary one is generated when absent
    #[oai(skip_serializing_if_is_none)]
    pub new_password: Option<String>,
}

/// Response model for an administrative password reset
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct ResetPasswordResponse {
    /// Success message
    pub message: String,

    /// Generated temporary password; present only when the caller did not
    /// supply one
    #[oai(skip_serializing_if_is_none)]
    pub temp_password: Option<String>,
}

/// Request model for a partial profile update
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New username; must remain unique
    #[oai(skip_serializing_if_is_none)]
    pub username: Option<String>,

    /// New full name
    #[oai(skip_serializing_if_is_none)]
    pub full_name: Option<String>,

    /// New contact email
    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,

    /// New contact phone number
    #[oai(skip_serializing_if_is_none)]
    pub phone: Option<String>,
}

/// Response model for a profile update: echoes exactly the fields that
/// changed, with their new values.
#[derive(Object, Debug, Serialize, Deserialize)]
#[oai(rename_all = "camelCase")]
pub struct UpdateProfileResponse {
    /// Id of the updated user
    pub id: String,

    #[oai(skip_serializing_if_is_none)]
    pub username: Option<String>,

    #[oai(skip_serializing_if_is_none)]
    pub full_name: Option<String>,

    #[oai(skip_serializing_if_is_none)]
    pub email: Option<String>,

    #[oai(skip_serializing_if_is_none)]
    pub phone: Option<String>,
}
