use std::env;

use sqlx::postgres::PgConnectOptions;

use crate::error::AppError;

/// Process configuration, loaded once at startup and handed to the
/// constructors that need it.
#[derive(Debug, Clone)]
pub struct Config {
    pub db_host: String,
    pub db_port: u16,
    pub db_user: String,
    pub db_pass: String,
    pub db_name: String,
    pub db_max_connections: u32,
    pub server_host: String,
    pub server_port: u16,
    pub jwt_secret_key: String,
    pub jwt_refresh_secret_key: String,
    pub access_token_expire_minutes: i64,
    pub refresh_token_expire_minutes: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Fails on the first required key that is missing or empty, and on any
    /// value that does not parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String, AppError> {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };
        let optional = |key: &str, default: &str| -> String {
            lookup(key)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            db_host: required("DB_HOST")?,
            db_port: parse("DB_PORT", &required("DB_PORT")?)?,
            db_user: required("DB_USER")?,
            db_pass: required("DB_PASS")?,
            db_name: required("DB_NAME")?,
            db_max_connections: parse("DB_MAX_CONNECTIONS", &optional("DB_MAX_CONNECTIONS", "5"))?,
            server_host: optional("SERVER_HOST", "127.0.0.1"),
            server_port: parse("SERVER_PORT", &optional("SERVER_PORT", "8000"))?,
            jwt_secret_key: required("JWT_SECRET_KEY")?,
            jwt_refresh_secret_key: required("JWT_REFRESH_SECRET_KEY")?,
            access_token_expire_minutes: parse(
                "ACCESS_TOKEN_EXPIRE_MINUTES",
                &optional("ACCESS_TOKEN_EXPIRE_MINUTES", "30"),
            )?,
            refresh_token_expire_minutes: parse(
                "REFRESH_TOKEN_EXPIRE_MINUTES",
                &optional("REFRESH_TOKEN_EXPIRE_MINUTES", "10080"),
            )?,
            bcrypt_cost: parse("BCRYPT_COST", &optional("BCRYPT_COST", "12"))?,
        };

        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<(), AppError> {
        if self.jwt_secret_key == self.jwt_refresh_secret_key {
            return Err(AppError::Config(
                "JWT_SECRET_KEY and JWT_REFRESH_SECRET_KEY must differ".into(),
            ));
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(AppError::Config("BCRYPT_COST must be between 4 and 31".into()));
        }
        if self.access_token_expire_minutes <= 0 || self.refresh_token_expire_minutes <= 0 {
            return Err(AppError::Config("token lifetimes must be positive".into()));
        }
        Ok(())
    }

    /// Connection options built field by field, so credentials need no URL escaping.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_pass)
            .database(&self.db_name)
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, AppError> {
    value
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, value)))
}
