use {
    std::{env, str::FromStr, time::Duration},
    thiserror::Error,
};

pub const DEFAULT_PORT: u16 = 5000;
pub const DEFAULT_RATE_LIMIT_MAX: u32 = 100;
pub const DEFAULT_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 20;
pub const MAX_RATE_LIMIT_MAX: u32 = 100_000;
pub const MAX_RATE_LIMIT_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got: {value}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },

    #[error("{name} must be at most {max}, got: {value}")]
    TooLarge {
        name: &'static str,
        max: u64,
        value: u64,
    },
}

/// Sliding-window quota applied per client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: DEFAULT_RATE_LIMIT_MAX,
            window: DEFAULT_RATE_LIMIT_WINDOW,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Deployment label (`NODE_ENV`). Only reported at startup.
    pub environment: String,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub rate_limit: RateLimitConfig,
    pub body_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            environment: "development".to_string(),
            database_url: None,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            rate_limit: RateLimitConfig::default(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Config {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let window_secs = parse(
            &lookup,
            "RATE_LIMIT_WINDOW_SECS",
            "number of seconds",
            defaults.rate_limit.window.as_secs(),
        )?;
        let max_requests = parse(
            &lookup,
            "RATE_LIMIT_MAX",
            "request count",
            defaults.rate_limit.max_requests,
        )?;
        if window_secs == 0 {
            return Err(ConfigError::Zero {
                name: "RATE_LIMIT_WINDOW_SECS",
            });
        }
        if max_requests == 0 {
            return Err(ConfigError::Zero {
                name: "RATE_LIMIT_MAX",
            });
        }
        if window_secs > MAX_RATE_LIMIT_WINDOW.as_secs() {
            return Err(ConfigError::TooLarge {
                name: "RATE_LIMIT_WINDOW_SECS",
                max: MAX_RATE_LIMIT_WINDOW.as_secs(),
                value: window_secs,
            });
        }
        if max_requests > MAX_RATE_LIMIT_MAX {
            return Err(ConfigError::TooLarge {
                name: "RATE_LIMIT_MAX",
                max: MAX_RATE_LIMIT_MAX.into(),
                value: max_requests.into(),
            });
        }

        Ok(Self {
            port: parse(&lookup, "PORT", "port number", defaults.port)?,
            environment: lookup("NODE_ENV")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.environment),
            database_url: lookup("DATABASE_URL").filter(|v| !v.trim().is_empty()),
            max_connections: parse(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                "connection count",
                defaults.max_connections,
            )?,
            rate_limit: RateLimitConfig {
                max_requests,
                window: Duration::from_secs(window_secs),
            },
            body_limit: parse(
                &lookup,
                "BODY_LIMIT_BYTES",
                "byte count",
                defaults.body_limit,
            )?,
        })
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(name) {
        None => Ok(default),
        Some(raw) if raw.trim().is_empty() => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value: raw,
        }),
    }
}
