// Internal types - never serialized to clients directly
pub mod auth;
