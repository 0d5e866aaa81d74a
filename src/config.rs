//! Configuration module
//!
//! TOML configuration loaded from `~/.config/credit-service/config.toml`
//! (overridable via the `CREDIT_CONFIG` environment variable). A missing or
//! broken file falls back to defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    pub admin: AdminConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub api_host: String,
    pub api_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8080,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// SQLite file path; ignored when `url` is set explicitly.
    pub sqlite_path: String,
    /// Full connection URL override (e.g. a PostgreSQL DSN).
    pub url: Option<String>,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            sqlite_path: "./credit_app.db".to_string(),
            url: None,
        }
    }
}

impl DatabaseSettings {
    pub fn connection_url(&self) -> String {
        match &self.url {
            Some(url) => url.clone(),
            None => format!("sqlite://{}?mode=rwc", self.sqlite_path),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    /// Consecutive failed logins before the username is locked out.
    pub max_login_attempts: u32,
    /// Lockout window in seconds once the attempt limit is hit.
    pub lockout_seconds: u64,
    /// Delay applied to every failed login attempt, in milliseconds.
    pub failed_login_delay_ms: u64,
    pub min_password_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "change-me-in-production".to_string(),
            jwt_expiration_hours: 24,
            max_login_attempts: 3,
            lockout_seconds: 30,
            failed_login_delay_ms: 1000,
            min_password_length: 8,
        }
    }
}

/// Bootstrap admin account, created on first start when the users table
/// is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub full_name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin123".to_string(),
            full_name: "Administrator".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config = toml::from_str(&raw)?;
        Ok(config)
    }

}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Default config file location: `~/.config/credit-service/config.toml`.
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("credit-service")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.api_port, 8080);
        assert_eq!(cfg.security.max_login_attempts, 3);
        assert_eq!(cfg.security.failed_login_delay_ms, 1000);
        assert_eq!(cfg.security.min_password_length, 8);
        assert!(cfg.database.connection_url().starts_with("sqlite://"));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            api_port = 9999

            [security]
            jwt_secret = "test-secret"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.api_port, 9999);
        assert_eq!(cfg.server.api_host, "0.0.0.0");
        assert_eq!(cfg.security.jwt_secret, "test-secret");
        assert_eq!(cfg.security.jwt_expiration_hours, 24);
    }

    #[test]
    fn explicit_url_wins_over_sqlite_path() {
        let settings = DatabaseSettings {
            sqlite_path: "./x.db".into(),
            url: Some("postgres://localhost/credit".into()),
        };
        assert_eq!(settings.connection_url(), "postgres://localhost/credit");
    }
}
