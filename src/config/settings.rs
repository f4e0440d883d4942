use std::env;

/// Configuration errors raised while reading the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(String),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Application settings, loaded once at startup
#[derive(Clone)]
pub struct AppSettings {
    pub database_url: String,
    pub bind_addr: String,
    pub jwt_secret: String,
    pub refresh_token_secret: String,
    pub password_pepper: String,
    pub access_token_minutes: i64,
    pub refresh_token_days: i64,
}

impl AppSettings {
    /// Load settings from environment variables
    ///
    /// The three secrets are required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://kantin.db?mode=rwc".to_string());

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let jwt_secret = Self::required("JWT_SECRET")?;
        let refresh_token_secret = Self::required("REFRESH_TOKEN_SECRET")?;
        let password_pepper = Self::required("PASSWORD_PEPPER")?;

        let access_token_minutes = Self::numeric("ACCESS_TOKEN_MINUTES", 15)?;
        let refresh_token_days = Self::numeric("REFRESH_TOKEN_DAYS", 7)?;

        Ok(Self {
            database_url,
            bind_addr,
            jwt_secret,
            refresh_token_secret,
            password_pepper,
            access_token_minutes,
            refresh_token_days,
        })
    }

    fn required(name: &str) -> Result<String, ConfigError> {
        env::var(name).map_err(|_| ConfigError::MissingVar(name.to_string()))
    }

    fn numeric(name: &str, default: i64) -> Result<i64, ConfigError> {
        match env::var(name) {
            Err(_) => Ok(default),
            Ok(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: name.to_string(),
                value,
            }),
        }
    }
}

impl std::fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppSettings")
            .field("database_url", &self.database_url)
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("password_pepper", &"<redacted>")
            .field("access_token_minutes", &self.access_token_minutes)
            .field("refresh_token_days", &self.refresh_token_days)
            .finish()
    }
}
