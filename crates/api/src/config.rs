//! Process configuration, read once at startup from the environment.

use chrono::Duration;
use thiserror::Error;

use blogapi_auth::TokenSettings;

const DEV_SECRET: &str = "dev-secret";

/// Upper bound for `ACCESS_TOKEN_TTL_MINUTES` (one day).
pub const MAX_ACCESS_TTL_MINUTES: i64 = 24 * 60;

/// Upper bound for `REFRESH_TOKEN_TTL_DAYS`.
pub const MAX_REFRESH_TTL_DAYS: i64 = 365;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} must be a positive integer, got '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must be at most {max}, got {value}")]
    OutOfRange {
        name: &'static str,
        value: i64,
        max: i64,
    },
}

/// Server configuration.
///
/// The signing secret lives here and is handed to the token service at
/// construction; nothing reads it from a global.
#[derive(Clone)]
pub struct ApiConfig {
    pub bind_addr: String,
    pub jwt_secret: String,
    pub access_ttl_minutes: i64,
    pub refresh_ttl_days: i64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
            jwt_secret: DEV_SECRET.to_string(),
            access_ttl_minutes: 30,
            refresh_ttl_days: 7,
        }
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .finish()
    }
}

impl ApiConfig {
    /// Read `BLOGAPI_BIND_ADDR`, `JWT_SECRET`, `ACCESS_TOKEN_TTL_MINUTES` and
    /// `REFRESH_TOKEN_TTL_DAYS`, falling back to defaults for unset values.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let jwt_secret = lookup("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            defaults.jwt_secret.clone()
        });

        Ok(Self {
            bind_addr: lookup("BLOGAPI_BIND_ADDR").unwrap_or(defaults.bind_addr),
            jwt_secret,
            access_ttl_minutes: bounded(
                &lookup,
                "ACCESS_TOKEN_TTL_MINUTES",
                defaults.access_ttl_minutes,
                MAX_ACCESS_TTL_MINUTES,
            )?,
            refresh_ttl_days: bounded(
                &lookup,
                "REFRESH_TOKEN_TTL_DAYS",
                defaults.refresh_ttl_days,
                MAX_REFRESH_TTL_DAYS,
            )?,
        })
    }

    /// Token lifetimes as durations. Fails for values outside the allowed
    /// range, including ones set on the struct directly.
    pub fn token_settings(&self) -> Result<TokenSettings, ConfigError> {
        let access = in_range("ACCESS_TOKEN_TTL_MINUTES", self.access_ttl_minutes, MAX_ACCESS_TTL_MINUTES)
            .and_then(|m| {
                Duration::try_minutes(m).ok_or(ConfigError::OutOfRange {
                    name: "ACCESS_TOKEN_TTL_MINUTES",
                    value: m,
                    max: MAX_ACCESS_TTL_MINUTES,
                })
            })?;
        let refresh = in_range("REFRESH_TOKEN_TTL_DAYS", self.refresh_ttl_days, MAX_REFRESH_TTL_DAYS)
            .and_then(|d| {
                Duration::try_days(d).ok_or(ConfigError::OutOfRange {
                    name: "REFRESH_TOKEN_TTL_DAYS",
                    value: d,
                    max: MAX_REFRESH_TTL_DAYS,
                })
            })?;

        Ok(TokenSettings::new(self.jwt_secret.as_bytes())
            .with_access_ttl(access)
            .with_refresh_ttl(refresh))
    }
}

fn bounded<F>(lookup: &F, name: &'static str, default: i64, max: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(default);
    };
    match raw.trim().parse::<i64>() {
        Ok(v) if v > 0 => in_range(name, v, max),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

fn in_range(name: &'static str, value: i64, max: i64) -> Result<i64, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidNumber {
            name,
            value: value.to_string(),
        });
    }
    if value > max {
        return Err(ConfigError::OutOfRange { name, value, max });
    }
    Ok(value)
}
