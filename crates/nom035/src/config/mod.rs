use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use crate::assessment::RiskThresholds;

const DEVELOPMENT_JWT_SECRET: &str = "nom035-development-secret";
const MAX_TOKEN_TTL_MINUTES: u64 = 60 * 24 * 365;

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
    pub auth: AuthConfig,
    pub scoring: RiskThresholds,
    pub seed_demo_data: bool,
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

        let jwt_secret = match env::var("APP_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => secret,
            _ if environment == AppEnvironment::Production => {
                return Err(ConfigError::MissingJwtSecret)
            }
            _ => DEVELOPMENT_JWT_SECRET.to_string(),
        };
        let token_ttl = token_ttl(parse_number("APP_TOKEN_TTL_MINUTES", 60)?)?;
        let denylist_sweep_secs = parse_number("APP_DENYLIST_SWEEP_SECS", 300)?;

        let medium_from = parse_number("APP_RISK_MEDIUM_FROM", 10)?;
        let high_from = parse_number("APP_RISK_HIGH_FROM", 20)?;
        let scoring = u32::try_from(medium_from)
            .ok()
            .zip(u32::try_from(high_from).ok())
            .and_then(|(medium_from, high_from)| RiskThresholds::new(medium_from, high_from))
            .ok_or(ConfigError::InvalidRiskThresholds {
                medium_from,
                high_from,
            })?;

        let seed_demo_data = env::var("APP_SEED_DEMO")
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            auth: AuthConfig {
                jwt_secret,
                token_ttl,
                denylist_sweep_interval: Duration::from_secs(denylist_sweep_secs),
            },
            scoring,
            seed_demo_data,
        })
    }
}

fn parse_number(key: &'static str, default: u64) -> Result<u64, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidNumber { key, value: raw }),
        Err(_) => Ok(default),
    }
}

/// Token lifetime between one minute and one year.
fn token_ttl(minutes: u64) -> Result<Duration, ConfigError> {
    minutes
        .checked_mul(60)
        .filter(|_| (1..=MAX_TOKEN_TTL_MINUTES).contains(&minutes))
        .map(Duration::from_secs)
        .ok_or(ConfigError::InvalidTokenTtl { minutes })
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

/// Token signing and revocation settings.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub denylist_sweep_interval: Duration,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("denylist_sweep_interval", &self.denylist_sweep_interval)
            .finish()
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    MissingJwtSecret,
    InvalidNumber { key: &'static str, value: String },
    InvalidRiskThresholds { medium_from: u64, high_from: u64 },
    InvalidTokenTtl { minutes: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::MissingJwtSecret => {
                write!(f, "APP_JWT_SECRET is required in production")
            }
            ConfigError::InvalidNumber { key, value } => {
                write!(f, "{key} must be a non-negative integer (found '{value}')")
            }
            ConfigError::InvalidRiskThresholds {
                medium_from,
                high_from,
            } => write!(
                f,
                "APP_RISK_MEDIUM_FROM ({medium_from}) must not exceed APP_RISK_HIGH_FROM ({high_from})"
            ),
            ConfigError::InvalidTokenTtl { minutes } => write!(
                f,
                "APP_TOKEN_TTL_MINUTES must be between 1 and {MAX_TOKEN_TTL_MINUTES} (found {minutes})"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::MissingJwtSecret
            | ConfigError::InvalidNumber { .. }
            | ConfigError::InvalidRiskThresholds { .. }
            | ConfigError::InvalidTokenTtl { .. } => None,
        }
    }
}
