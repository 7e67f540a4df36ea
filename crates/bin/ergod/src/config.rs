//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `ergo.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use ergo_adapter_http_axum::router::RouterOptions;

const CONFIG_FILE: &str = "ergo.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Store settings.
    pub database: DatabaseConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
    /// Per-request deadline, in seconds.
    pub request_timeout_secs: u64,
    /// How long in-flight requests get to finish after a stop signal.
    pub shutdown_timeout_secs: u64,
    /// Directory served under `/static`.
    pub static_dir: Option<PathBuf>,
}

/// Which [`ergo_app::ports::TodoRepository`] implementation backs the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    #[default]
    Sqlite,
    Memory,
}

impl FromStr for DatabaseDriver {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Validation(format!(
                "unknown database driver {other:?} (expected sqlite or memory)"
            ))),
        }
    }
}

/// Store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub driver: DatabaseDriver,
    /// `SQLite` connection URL. Ignored by the `memory` driver.
    pub url: String,
    pub max_connections: u32,
    /// `0` disables the lifetime bound.
    pub max_lifetime_secs: u64,
    /// `0` keeps idle connections forever.
    pub idle_timeout_secs: u64,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unknown log format {other:?} (expected text or json)"
            ))),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    pub format: LogFormat,
}

impl Config {
    /// Load configuration from `ergo.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, an
    /// override cannot be parsed, or the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(CONFIG_FILE, |key| std::env::var(key).ok())
    }

    fn load_from(path: &str, env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(env)?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(
        &mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = env("ERGO_HOST") {
            self.server.host = val;
        }
        if let Some(val) = env("ERGO_PORT") {
            self.server.port = parse_var("ERGO_PORT", &val)?;
        }
        if let Some(val) = env("ERGO_REQUEST_TIMEOUT_SECS") {
            self.server.request_timeout_secs = parse_var("ERGO_REQUEST_TIMEOUT_SECS", &val)?;
        }
        if let Some(val) = env("ERGO_SHUTDOWN_TIMEOUT_SECS") {
            self.server.shutdown_timeout_secs = parse_var("ERGO_SHUTDOWN_TIMEOUT_SECS", &val)?;
        }
        if let Some(val) = env("ERGO_STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(val));
        }
        if let Some(val) = env("ERGO_DATABASE_DRIVER") {
            self.database.driver = val.parse()?;
        }
        if let Some(val) = env("ERGO_DATABASE_URL") {
            self.database.url = val;
        }
        if let Some(val) = env("ERGO_LOG").or_else(|| env("RUST_LOG")) {
            self.logging.filter = val;
        }
        if let Some(val) = env("ERGO_LOG_FORMAT") {
            self.logging.format = val.parse()?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.server.request_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "request_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.server.shutdown_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "shutdown_timeout_secs must be non-zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "max_connections must be non-zero".to_string(),
            ));
        }
        if self.database.driver == DatabaseDriver::Sqlite && self.database.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "database url is required for the sqlite driver".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Deadline for draining in-flight requests on shutdown.
    #[must_use]
    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.server.shutdown_timeout_secs)
    }

    /// Router knobs derived from the server section.
    #[must_use]
    pub fn router_options(&self) -> RouterOptions {
        RouterOptions {
            request_timeout: Duration::from_secs(self.server.request_timeout_secs),
            static_dir: self.server.static_dir.clone(),
        }
    }

    /// Pool settings for the `SQLite` adapter.
    #[must_use]
    pub fn storage_config(&self) -> ergo_adapter_storage_sqlite_sqlx::Config {
        let db = &self.database;
        ergo_adapter_storage_sqlite_sqlx::Config {
            database_url: db.url.clone(),
            max_connections: db.max_connections,
            max_lifetime: non_zero_secs(db.max_lifetime_secs),
            idle_timeout: non_zero_secs(db.idle_timeout_secs),
        }
    }
}

fn non_zero_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}

fn parse_var<T: FromStr>(key: &str, val: &str) -> Result<T, ConfigError> {
    val.trim()
        .parse()
        .map_err(|_| ConfigError::Validation(format!("{key} has an invalid value: {val:?}")))
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 60,
            shutdown_timeout_secs: 10,
            static_dir: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::Sqlite,
            url: "sqlite:ergo.db?mode=rwc".to_string(),
            max_connections: 10,
            max_lifetime_secs: 180,
            idle_timeout_secs: 600,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "ergod=info,ergo=info,tower_http=info".to_string(),
            format: LogFormat::Text,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn should_produce_sensible_defaults() {
        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(10));
        assert_eq!(config.router_options().request_timeout, Duration::from_secs(60));
        assert_eq!(config.database.driver, DatabaseDriver::Sqlite);
        assert_eq!(config.database.url, "sqlite:ergo.db?mode=rwc");
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn should_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_parse_full_toml() {
        let toml = "
            [server]
            host = '127.0.0.1'
            port = 9090
            request_timeout_secs = 5
            shutdown_timeout_secs = 2
            static_dir = 'public'

            [database]
            driver = 'memory'
            url = 'sqlite:test.db'
            max_connections = 4
            max_lifetime_secs = 0
            idle_timeout_secs = 30

            [logging]
            filter = 'debug'
            format = 'json'
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:9090");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(2));
        assert_eq!(config.server.static_dir, Some(PathBuf::from("public")));
        assert_eq!(config.database.driver, DatabaseDriver::Memory);
        assert_eq!(config.logging.filter, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);

        let storage = config.storage_config();
        assert_eq!(storage.database_url, "sqlite:test.db");
        assert_eq!(storage.max_connections, 4);
        assert_eq!(storage.max_lifetime, None);
        assert_eq!(storage.idle_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn should_parse_partial_toml_with_defaults() {
        let toml = "
            [server]
            port = 3000
        ";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.database.url, "sqlite:ergo.db?mode=rwc");
    }

    #[test]
    fn should_reject_unknown_driver_in_toml() {
        let result: Result<Config, _> = toml::from_str("[database]\ndriver = 'mysql'");
        assert!(result.is_err());
    }

    #[test]
    fn should_report_parse_error_for_invalid_toml() {
        let result: Result<Config, _> = toml::from_str("invalid {{{");
        assert!(result.is_err());
    }

    #[test]
    fn should_return_default_when_file_not_found() {
        let config = Config::load_from("nonexistent.toml", env_of(&[])).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn should_apply_env_overrides() {
        let config = Config::load_from(
            "nonexistent.toml",
            env_of(&[
                ("ERGO_HOST", "127.0.0.1"),
                ("ERGO_PORT", "9999"),
                ("ERGO_REQUEST_TIMEOUT_SECS", "3"),
                ("ERGO_SHUTDOWN_TIMEOUT_SECS", "4"),
                ("ERGO_STATIC_DIR", "/srv/static"),
                ("ERGO_DATABASE_DRIVER", "memory"),
                ("ERGO_DATABASE_URL", "sqlite::memory:"),
                ("ERGO_LOG_FORMAT", "json"),
            ]),
        )
        .unwrap();

        assert_eq!(config.bind_addr(), "127.0.0.1:9999");
        assert_eq!(config.router_options().request_timeout, Duration::from_secs(3));
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(4));
        assert_eq!(
            config.router_options().static_dir,
            Some(PathBuf::from("/srv/static"))
        );
        assert_eq!(config.database.driver, DatabaseDriver::Memory);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn should_prefer_ergo_log_over_rust_log() {
        let config = Config::load_from(
            "nonexistent.toml",
            env_of(&[("ERGO_LOG", "ergod=trace"), ("RUST_LOG", "warn")]),
        )
        .unwrap();
        assert_eq!(config.logging.filter, "ergod=trace");

        let config =
            Config::load_from("nonexistent.toml", env_of(&[("RUST_LOG", "warn")])).unwrap();
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn should_reject_unparsable_env_values() {
        for (key, value) in [
            ("ERGO_PORT", "eighty"),
            ("ERGO_PORT", "70000"),
            ("ERGO_SHUTDOWN_TIMEOUT_SECS", "-1"),
            ("ERGO_DATABASE_DRIVER", "postgres"),
            ("ERGO_LOG_FORMAT", "yaml"),
        ] {
            let result = Config::load_from("nonexistent.toml", env_of(&[(key, value)]));
            assert!(
                matches!(result, Err(ConfigError::Validation(_))),
                "{key}={value}"
            );
        }
    }

    #[test]
    fn should_reject_zero_port() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_reject_zero_timeouts_and_pool_size() {
        let mut config = Config::default();
        config.server.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.server.shutdown_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn should_require_url_only_for_sqlite() {
        let mut config = Config::default();
        config.database.url = "  ".to_string();
        assert!(config.validate().is_err());

        config.database.driver = DatabaseDriver::Memory;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_accept_defaults() {
        assert!(Config::default().validate().is_ok());
    }
}
