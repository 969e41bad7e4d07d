//! Environment-driven runtime configuration.
//!
//! # Responsibility
//! - Resolve database path, token signing settings and logging settings.
//!
//! # Invariants
//! - A configuration never exists without a non-empty signing secret.
//! - The secret is never printed through `Debug`.

use crate::auth::token::{TokenService, DEFAULT_TOKEN_TTL_HOURS};
use crate::logging::default_log_level;
use chrono::Duration;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FASTMEMO_DB_PATH";
pub const ENV_JWT_SECRET: &str = "FASTMEMO_JWT_SECRET";
pub const ENV_TOKEN_TTL_HOURS: &str = "FASTMEMO_TOKEN_TTL_HOURS";
pub const ENV_LOG_LEVEL: &str = "FASTMEMO_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FASTMEMO_LOG_DIR";

pub const DEFAULT_DB_PATH: &str = "memo_app.db";
const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingVar(&'static str),
    InvalidVar {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingVar(key) => write!(f, "missing required setting `{key}`"),
            Self::InvalidVar { key, value, reason } => {
                write!(f, "invalid value `{value}` for `{key}`: {reason}")
            }
        }
    }
}

impl Error for ConfigError {}

/// Resolved runtime settings.
#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub log_level: String,
    /// Absolute log directory; file logging stays off when `None`.
    pub log_dir: Option<String>,
}

impl Debug for AppConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("db_path", &self.db_path)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .field("log_level", &self.log_level)
            .field("log_dir", &self.log_dir)
            .finish()
    }
}

impl AppConfig {
    /// Reads settings from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns a variable's value.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let jwt_secret = get(ENV_JWT_SECRET).ok_or(ConfigError::MissingVar(ENV_JWT_SECRET))?;
        let db_path = PathBuf::from(get(ENV_DB_PATH).unwrap_or_else(|| DEFAULT_DB_PATH.to_string()));
        let token_ttl_hours = match get(ENV_TOKEN_TTL_HOURS) {
            Some(value) => parse_ttl_hours(&value)?,
            None => DEFAULT_TOKEN_TTL_HOURS,
        };
        let log_level = get(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string());
        let log_dir = get(ENV_LOG_DIR);

        Ok(Self {
            db_path,
            jwt_secret,
            token_ttl_hours,
            log_level,
            log_dir,
        })
    }

    /// Builds the token service described by this configuration.
    pub fn token_service(&self) -> TokenService {
        TokenService::new(
            self.jwt_secret.as_bytes(),
            Duration::hours(self.token_ttl_hours),
        )
    }
}

fn parse_ttl_hours(value: &str) -> Result<i64, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidVar {
        key: ENV_TOKEN_TTL_HOURS,
        value: value.to_string(),
        reason: reason.to_string(),
    };
    let hours: i64 = value
        .parse()
        .map_err(|_| invalid("expected a whole number of hours"))?;
    if !(1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        return Err(invalid("must be between 1 and 8760"));
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::{
        AppConfig, ConfigError, DEFAULT_DB_PATH, ENV_DB_PATH, ENV_JWT_SECRET, ENV_LOG_DIR,
        ENV_TOKEN_TTL_HOURS,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secret_is_set() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_JWT_SECRET, "s3cret")])).unwrap();
        assert_eq!(config.db_path, PathBuf::from(DEFAULT_DB_PATH));
        assert_eq!(config.token_ttl_hours, 72);
        assert_eq!(config.log_dir, None);
        assert_eq!(config.token_service().ttl().num_hours(), 72);
    }

    #[test]
    fn missing_or_blank_secret_is_rejected() {
        let err = AppConfig::from_lookup(lookup(&[])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_JWT_SECRET));

        let err = AppConfig::from_lookup(lookup(&[(ENV_JWT_SECRET, "   ")])).unwrap_err();
        assert_eq!(err, ConfigError::MissingVar(ENV_JWT_SECRET));
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            (ENV_JWT_SECRET, "s3cret"),
            (ENV_DB_PATH, "/tmp/memos/app.db"),
            (ENV_TOKEN_TTL_HOURS, "1"),
            (ENV_LOG_DIR, "/tmp/memos/logs"),
        ]))
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/memos/app.db"));
        assert_eq!(config.token_ttl_hours, 1);
        assert_eq!(config.log_dir.as_deref(), Some("/tmp/memos/logs"));
    }

    #[test]
    fn invalid_ttl_is_rejected() {
        for raw in ["zero", "0", "-5", "100000"] {
            let err = AppConfig::from_lookup(lookup(&[
                (ENV_JWT_SECRET, "s3cret"),
                (ENV_TOKEN_TTL_HOURS, raw),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::InvalidVar { key, .. } if key == ENV_TOKEN_TTL_HOURS));
        }
    }

    #[test]
    fn debug_output_redacts_secret() {
        let config = AppConfig::from_lookup(lookup(&[(ENV_JWT_SECRET, "s3cret")])).unwrap();
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("<redacted>"));
    }
}
