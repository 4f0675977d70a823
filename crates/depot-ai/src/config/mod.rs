use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub engine: EngineSettings,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("DEPOT_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("DEPOT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("DEPOT_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("DEPOT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let iot_lookback_hours = env::var("DEPOT_IOT_LOOKBACK_HOURS")
            .unwrap_or_else(|_| "24".to_string())
            .parse::<i64>()
            .map_err(|_| ConfigError::InvalidLookback)?;
        if iot_lookback_hours <= 0 {
            return Err(ConfigError::InvalidLookback);
        }

        let insight_window = env::var("DEPOT_INSIGHT_WINDOW")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<usize>()
            .map_err(|_| ConfigError::InvalidInsightWindow)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            engine: EngineSettings {
                iot_lookback_hours,
                insight_window,
            },
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

/// Environment-tunable planner knobs. Weight vectors and yard layout stay in
/// code; only operational windows are exposed here.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub iot_lookback_hours: i64,
    pub insight_window: usize,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidLookback,
    InvalidInsightWindow,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "DEPOT_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "DEPOT_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidLookback => {
                write!(f, "DEPOT_IOT_LOOKBACK_HOURS must be a positive hour count")
            }
            ConfigError::InvalidInsightWindow => {
                write!(f, "DEPOT_INSIGHT_WINDOW must be a run count")
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("DEPOT_ENV");
        env::remove_var("DEPOT_HOST");
        env::remove_var("DEPOT_PORT");
        env::remove_var("DEPOT_LOG_LEVEL");
        env::remove_var("DEPOT_IOT_LOOKBACK_HOURS");
        env::remove_var("DEPOT_INSIGHT_WINDOW");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.engine.iot_lookback_hours, 24);
        assert_eq!(config.engine.insight_window, 30);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DEPOT_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 8080));
        env::remove_var("DEPOT_HOST");
    }

    #[test]
    fn rejects_garbage_port() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DEPOT_PORT", "yard");
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidPort)));
        env::remove_var("DEPOT_PORT");
    }

    #[test]
    fn rejects_non_positive_lookback() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("DEPOT_IOT_LOOKBACK_HOURS", "0");
        let result = AppConfig::load();
        assert!(matches!(result, Err(ConfigError::InvalidLookback)));
        env::remove_var("DEPOT_IOT_LOOKBACK_HOURS");
    }
}
