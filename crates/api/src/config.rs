use std::time::Duration;

use guau_core::behavior::catalog::{
    DEFAULT_CHRONIC_THRESHOLD, DEFAULT_CHRONIC_WINDOW_HOURS, DEFAULT_STRESS_THRESHOLD,
    DEFAULT_STRESS_WINDOW_MINS,
};
use guau_core::behavior::{PatternThresholds, DEFAULT_QUERY_TIMEOUT};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// Every field except the JWT secret has a default suitable for local
/// development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to drain after shutdown (default: `10`).
    pub shutdown_timeout_secs: u64,
    /// Origin of the web app, used to build share links in notifications.
    pub public_base_url: String,
    pub jwt: JwtConfig,
    pub alerts: AlertSettings,
}

/// Tuning for the behavior alert engine.
#[derive(Debug, Clone)]
pub struct AlertSettings {
    pub thresholds: PatternThresholds,
    /// Upper bound for each event store query, evaluation and feed alike.
    pub query_timeout: Duration,
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            thresholds: PatternThresholds::default(),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|_| panic!("{name} must be a valid {}", std::any::type_name::<T>())),
        Err(_) => default,
    }
}

impl AlertSettings {
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `ALERT_STRESS_WINDOW_MINS`   | `60`    |
    /// | `ALERT_STRESS_THRESHOLD`     | `3`     |
    /// | `ALERT_CHRONIC_WINDOW_HOURS` | `24`    |
    /// | `ALERT_CHRONIC_THRESHOLD`    | `5`     |
    /// | `ALERT_QUERY_TIMEOUT_MS`     | `2000`  |
    ///
    /// Values are range-checked when the catalog is built.
    pub fn from_env() -> Self {
        let thresholds = PatternThresholds {
            stress_window_mins: env_or("ALERT_STRESS_WINDOW_MINS", DEFAULT_STRESS_WINDOW_MINS),
            stress_threshold: env_or("ALERT_STRESS_THRESHOLD", DEFAULT_STRESS_THRESHOLD),
            chronic_window_hours: env_or(
                "ALERT_CHRONIC_WINDOW_HOURS",
                DEFAULT_CHRONIC_WINDOW_HOURS,
            ),
            chronic_threshold: env_or("ALERT_CHRONIC_THRESHOLD", DEFAULT_CHRONIC_THRESHOLD),
        };
        let query_timeout_ms: u64 = env_or(
            "ALERT_QUERY_TIMEOUT_MS",
            DEFAULT_QUERY_TIMEOUT.as_millis() as u64,
        );

        Self {
            thresholds,
            query_timeout: Duration::from_millis(query_timeout_ms),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                  |
    /// |-------------------------|--------------------------|
    /// | `HOST`                  | `0.0.0.0`                |
    /// | `PORT`                  | `3000`                   |
    /// | `CORS_ORIGINS`          | `http://localhost:5173`  |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                     |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `10`                     |
    /// | `PUBLIC_BASE_URL`       | `http://localhost:5173`  |
    ///
    /// JWT settings come from [`JwtConfig::from_env`] and alert tuning from
    /// [`AlertSettings::from_env`].
    ///
    /// # Panics
    ///
    /// Panics on unparseable values so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .trim_end_matches('/')
            .to_string();

        Self {
            host,
            port: env_or("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 10),
            public_base_url,
            jwt: JwtConfig::from_env(),
            alerts: AlertSettings::from_env(),
        }
    }
}
