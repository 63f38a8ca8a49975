use anyhow::{Context, Result, bail};
use std::env;
use std::str::FromStr;

const DEFAULT_PORT: u16 = 8000;
const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 900;
const DEFAULT_REFRESH_TOKEN_EXPIRY: i64 = 864_000;
const DEFAULT_RATE_LIMIT_PER_MINUTE: u64 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Ok(Environment::Production),
            "development" | "dev" | "test" => Ok(Environment::Development),
            other => bail!("Unknown APP_ENV value: {}", other),
        }
    }
}

/// Secrets and lifetimes for the token service.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    /// Seconds
    pub access_ttl: i64,
    pub refresh_secret: String,
    /// Seconds
    pub refresh_ttl: i64,
}

#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 20,
            min_connections: 5,
            acquire_timeout_secs: 3,
            idle_timeout_secs: 600,
        }
    }
}

/// Process configuration, read once at startup and passed down explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub port: u16,
    pub environment: Environment,
    pub tokens: TokenConfig,
    pub pool: PoolConfig,
    pub cors_allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} must be set", key))
        };

        let tokens = TokenConfig {
            access_secret: required("ACCESS_TOKEN_SECRET")?,
            access_ttl: parse_or(&lookup, "ACCESS_TOKEN_EXPIRY", DEFAULT_ACCESS_TOKEN_EXPIRY)?,
            refresh_secret: required("REFRESH_TOKEN_SECRET")?,
            refresh_ttl: parse_or(&lookup, "REFRESH_TOKEN_EXPIRY", DEFAULT_REFRESH_TOKEN_EXPIRY)?,
        };

        if tokens.access_secret == tokens.refresh_secret {
            bail!("ACCESS_TOKEN_SECRET and REFRESH_TOKEN_SECRET must differ");
        }
        if tokens.access_ttl <= 0 || tokens.refresh_ttl <= 0 {
            bail!("Token expiry values must be positive");
        }

        let defaults = PoolConfig::default();
        let pool = PoolConfig {
            max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", defaults.min_connections)?,
            acquire_timeout_secs: parse_or(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout_secs,
            )?,
            idle_timeout_secs: parse_or(&lookup, "DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs)?,
        };

        let environment = match lookup("APP_ENV") {
            Some(value) => value.parse()?,
            None => Environment::Development,
        };

        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let rate_limit_per_minute =
            parse_or(&lookup, "RATE_LIMIT_PER_MINUTE", DEFAULT_RATE_LIMIT_PER_MINUTE)?;
        if rate_limit_per_minute == 0 {
            bail!("RATE_LIMIT_PER_MINUTE must be greater than zero");
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            environment,
            tokens,
            pool,
            cors_allowed_origins,
            rate_limit_per_minute,
        })
    }

    pub fn secure_cookies(&self) -> bool {
        self.environment.is_production()
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e)),
        None => Ok(default),
    }
}
