use poem_openapi::{payload::Json, ApiResponse};
use std::fmt;

use crate::errors::auth::AuthError;
use crate::types::dto::common::ErrorResponse;

/// User-management error types
#[derive(ApiResponse, Debug)]
pub enum UserError {
    /// Identity could not be established
    #[oai(status = 401)]
    Unauthorized(Json<ErrorResponse>),

    /// Valid identity, insufficient role
    #[oai(status = 403)]
    Forbidden(Json<ErrorResponse>),

    /// Malformed input
    #[oai(status = 400)]
    BadRequest(Json<ErrorResponse>),

    /// Unknown resource id
    #[oai(status = 404)]
    NotFound(Json<ErrorResponse>),

    /// Uniqueness violation on nik or username
    #[oai(status = 409)]
    Conflict(Json<ErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl UserError {
    /// Create an Unauthorized error
    pub fn unauthorized(message: String) -> Self {
        UserError::Unauthorized(Json(ErrorResponse {
            error: "unauthorized".to_string(),
            message,
            status_code: 401,
        }))
    }

    /// Create a Forbidden error
    pub fn forbidden(message: String) -> Self {
        UserError::Forbidden(Json(ErrorResponse {
            error: "forbidden".to_string(),
            message,
            status_code: 403,
        }))
    }

    /// Create a BadRequest error
    pub fn bad_request(message: String) -> Self {
        UserError::BadRequest(Json(ErrorResponse {
            error: "bad_request".to_string(),
            message,
            status_code: 400,
        }))
    }

    /// Create a NotFound error
    pub fn not_found() -> Self {
        UserError::NotFound(Json(ErrorResponse {
            error: "not_found".to_string(),
            message: "User not found".to_string(),
            status_code: 404,
        }))
    }

    /// Create a Conflict error for a duplicate nik
    pub fn duplicate_nik() -> Self {
        UserError::Conflict(Json(ErrorResponse {
            error: "duplicate_nik".to_string(),
            message: "NIK already exists".to_string(),
            status_code: 409,
        }))
    }

    /// Create a Conflict error for a duplicate username
    pub fn duplicate_username() -> Self {
        UserError::Conflict(Json(ErrorResponse {
            error: "duplicate_username".to_string(),
            message: "Username already exists".to_string(),
            status_code: 409,
        }))
    }

    /// Create an InternalError
    pub fn internal_error(message: String) -> Self {
        UserError::InternalError(Json(ErrorResponse {
            error: "internal_error".to_string(),
            message,
            status_code: 500,
        }))
    }

    /// Get the error message from the error variant
    pub fn message(&self) -> String {
        match self {
            UserError::Unauthorized(json) => json.0.message.clone(),
            UserError::Forbidden(json) => json.0.message.clone(),
            UserError::BadRequest(json) => json.0.message.clone(),
            UserError::NotFound(json) => json.0.message.clone(),
            UserError::Conflict(json) => json.0.message.clone(),
            UserError::InternalError(json) => json.0.message.clone(),
        }
    }
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

// Bearer-authentication failures inside user-management handlers keep their
// 401/500 split; everything token-related collapses to Unauthorized.
impl From<AuthError> for UserError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InternalError(json) => UserError::InternalError(json),
            other => UserError::unauthorized(other.message()),
        }
    }
}
