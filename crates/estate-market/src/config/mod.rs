use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::marketplace::search::DEFAULT_PAGE_SIZE;

const DEFAULT_SESSION_TTL_MINS: u64 = 12 * 60;

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
    pub marketplace: MarketplaceConfig,
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
        let request_timeout_secs = env::var("APP_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or(ConfigError::InvalidTimeout)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let page_size = match env::var("MARKET_PAGE_SIZE") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize)?,
            Err(_) => DEFAULT_PAGE_SIZE,
        };
        let session_ttl_mins = match env::var("MARKET_SESSION_TTL_MINS") {
            Ok(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|mins| *mins > 0)
                .ok_or(ConfigError::InvalidSessionTtl)?,
            Err(_) => DEFAULT_SESSION_TTL_MINS,
        };
        let seed_password = env::var("MARKET_SEED_PASSWORD")
            .ok()
            .filter(|value| !value.trim().is_empty());

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                request_timeout: Duration::from_secs(request_timeout_secs),
            },
            telemetry: TelemetryConfig { log_level },
            marketplace: MarketplaceConfig {
                page_size,
                session_ttl: Duration::from_secs(session_ttl_mins.saturating_mul(60)),
                seed_password,
            },
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
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

/// Listing and browsing knobs handed to the marketplace service.
#[derive(Debug, Clone)]
pub struct MarketplaceConfig {
    pub page_size: usize,
    /// Idle lifetime of a bearer session.
    pub session_ttl: Duration,
    /// Password for the seller account created when seeding listings from CSV.
    pub seed_password: Option<String>,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_MINS * 60),
            seed_password: None,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidTimeout,
    InvalidPageSize,
    InvalidSessionTtl,
    MissingSeedPassword,
    InvalidHost { source: std::net::AddrParseError },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidTimeout => {
                write!(f, "APP_REQUEST_TIMEOUT_SECS must be a positive integer")
            }
            ConfigError::InvalidPageSize => {
                write!(f, "MARKET_PAGE_SIZE must be a positive integer")
            }
            ConfigError::InvalidSessionTtl => {
                write!(f, "MARKET_SESSION_TTL_MINS must be a positive integer")
            }
            ConfigError::MissingSeedPassword => {
                write!(f, "MARKET_SEED_PASSWORD must be set to seed listings")
            }
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
