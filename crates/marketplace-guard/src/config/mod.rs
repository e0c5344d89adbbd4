use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::validation::rules::{DEFAULT_MAX_DEADLINE_DAYS, DEFAULT_MAX_TEXT_LENGTH};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub validation: ValidationSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            validation: ValidationSettings::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Deployment overrides for the validation rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    pub max_deadline_days: i64,
    pub max_text_length: usize,
    /// Replaces the built-in disposable email denylist when set.
    pub disposable_domains: Option<Vec<String>>,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        Self {
            max_deadline_days: DEFAULT_MAX_DEADLINE_DAYS,
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
            disposable_domains: None,
        }
    }
}

impl ValidationSettings {
    fn from_env() -> Result<Self, ConfigError> {
        let max_deadline_days = positive_var("VALIDATION_MAX_DEADLINE_DAYS")?
            .unwrap_or(DEFAULT_MAX_DEADLINE_DAYS as u64);
        let max_text_length = positive_var("VALIDATION_MAX_TEXT_LENGTH")?
            .unwrap_or(DEFAULT_MAX_TEXT_LENGTH as u64);

        let disposable_domains = env::var("VALIDATION_DISPOSABLE_DOMAINS")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|domain| domain.trim().to_ascii_lowercase())
                    .filter(|domain| !domain.is_empty())
                    .collect::<Vec<_>>()
            });

        Ok(Self {
            max_deadline_days: i64::try_from(max_deadline_days).map_err(|_| {
                ConfigError::InvalidNumber {
                    key: "VALIDATION_MAX_DEADLINE_DAYS",
                }
            })?,
            max_text_length: usize::try_from(max_text_length).map_err(|_| {
                ConfigError::InvalidNumber {
                    key: "VALIDATION_MAX_TEXT_LENGTH",
                }
            })?,
            disposable_domains,
        })
    }
}

fn positive_var(key: &'static str) -> Result<Option<u64>, ConfigError> {
    match env::var(key) {
        Err(_) => Ok(None),
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => Ok(Some(value)),
            _ => Err(ConfigError::InvalidNumber { key }),
        },
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => write!(f, "{key} must be a positive integer"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
