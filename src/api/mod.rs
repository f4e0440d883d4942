// API layer - HTTP endpoints
pub mod auth;
pub mod health;
pub mod users;

pub use auth::AuthApi;
pub use health::HealthApi;
pub use users::UsersApi;
