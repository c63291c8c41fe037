use chrono::{Duration, Weekday};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_HOLIDAY_API_URL: &str = "https://brasilapi.com.br/api";
const DEFAULT_POSTAL_API_URL: &str = "https://viacep.com.br";
const DEFAULT_HOLIDAY_CACHE_TTL_HOURS: i64 = 24;
const DEFAULT_IDLE_TIMEOUT_MINUTES: i64 = 30;
const DEFAULT_CANCELLED_VISIBILITY_MINUTES: i64 = 10;

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
    pub calendar: CalendarConfig,
    pub session: SessionConfig,
    pub leave: LeaveConfig,
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

        let rest_day = match env::var("QB_REST_DAY") {
            Ok(raw) => parse_weekday(&raw).ok_or(ConfigError::InvalidRestDay(raw))?,
            Err(_) => Weekday::Sun,
        };

        let calendar = CalendarConfig {
            rest_day,
            holiday_api_url: env::var("QB_HOLIDAY_API_URL")
                .unwrap_or_else(|_| DEFAULT_HOLIDAY_API_URL.to_string()),
            holiday_cache_ttl: Duration::hours(positive_number(
                "QB_HOLIDAY_CACHE_TTL_HOURS",
                DEFAULT_HOLIDAY_CACHE_TTL_HOURS,
            )?),
            holiday_cache_dir: env::var("QB_HOLIDAY_CACHE_DIR").ok().map(PathBuf::from),
            postal_api_url: env::var("QB_POSTAL_API_URL")
                .unwrap_or_else(|_| DEFAULT_POSTAL_API_URL.to_string()),
        };

        let session = SessionConfig {
            idle_timeout: Duration::minutes(positive_number(
                "QB_IDLE_TIMEOUT_MINUTES",
                DEFAULT_IDLE_TIMEOUT_MINUTES,
            )?),
        };

        let leave = LeaveConfig {
            cancelled_visibility: Duration::minutes(positive_number(
                "QB_CANCELLED_VISIBILITY_MINUTES",
                DEFAULT_CANCELLED_VISIBILITY_MINUTES,
            )?),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            calendar,
            session,
            leave,
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

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Weekly rest day plus the public lookup endpoints used by the calendar module.
#[derive(Debug, Clone)]
pub struct CalendarConfig {
    pub rest_day: Weekday,
    pub holiday_api_url: String,
    pub holiday_cache_ttl: Duration,
    pub holiday_cache_dir: Option<PathBuf>,
    pub postal_api_url: String,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            rest_day: Weekday::Sun,
            holiday_api_url: DEFAULT_HOLIDAY_API_URL.to_string(),
            holiday_cache_ttl: Duration::hours(DEFAULT_HOLIDAY_CACHE_TTL_HOURS),
            holiday_cache_dir: None,
            postal_api_url: DEFAULT_POSTAL_API_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub idle_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::minutes(DEFAULT_IDLE_TIMEOUT_MINUTES),
        }
    }
}

/// How long a freshly cancelled leave request stays listed.
#[derive(Debug, Clone)]
pub struct LeaveConfig {
    pub cancelled_visibility: Duration,
}

impl Default for LeaveConfig {
    fn default() -> Self {
        Self {
            cancelled_visibility: Duration::minutes(DEFAULT_CANCELLED_VISIBILITY_MINUTES),
        }
    }
}

/// Accepts English and Portuguese day names (full or three-letter).
pub fn parse_weekday(value: &str) -> Option<Weekday> {
    match value.trim().to_lowercase().as_str() {
        "mon" | "monday" | "seg" | "segunda" => Some(Weekday::Mon),
        "tue" | "tuesday" | "ter" | "terca" | "terça" => Some(Weekday::Tue),
        "wed" | "wednesday" | "qua" | "quarta" => Some(Weekday::Wed),
        "thu" | "thursday" | "qui" | "quinta" => Some(Weekday::Thu),
        "fri" | "friday" | "sex" | "sexta" => Some(Weekday::Fri),
        "sat" | "saturday" | "sab" | "sabado" | "sábado" => Some(Weekday::Sat),
        "sun" | "sunday" | "dom" | "domingo" => Some(Weekday::Sun),
        _ => None,
    }
}

fn positive_number(key: &'static str, default: i64) -> Result<i64, ConfigError> {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse::<i64>() {
            Ok(value) if value > 0 => Ok(value),
            _ => Err(ConfigError::InvalidDuration { key, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidRestDay(String),
    InvalidDuration { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidRestDay(value) => {
                write!(f, "QB_REST_DAY '{value}' is not a weekday name")
            }
            ConfigError::InvalidDuration { key, value } => {
                write!(f, "{key} must be a positive whole number, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidRestDay(_)
            | ConfigError::InvalidDuration { .. } => None,
        }
    }
}
