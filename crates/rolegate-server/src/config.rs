//! Server configuration.
//!
//! Connection and listener settings come from flags or the environment
//! (`DB_HOST`, `DB_PORT`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`, `TZ`, `PORT`).
//! Authorization settings come from an optional TOML file:
//!
//! ```toml
//! [authorization]
//! header = "userId"
//! page_size = 100
//! query_timeout_ms = 5000
//! skip_paths = ["/greeting"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use http::HeaderName;
use rolegate_auth::{DEFAULT_PAGE_SIZE, RoleConfig, SkipPaths};
use rolegate_store::PostgresStoreConfig;
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

use crate::error::{Error, Result};

/// Rolegate demo server
#[derive(Parser, Debug, Clone)]
#[command(name = "rolegate")]
#[command(about = "Enrollment API behind role-based authorization", long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database host
    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    pub db_host: String,

    /// Database port
    #[arg(long, env = "DB_PORT", default_value_t = 5455)]
    pub db_port: u16,

    /// Database user
    #[arg(long, env = "DB_USER")]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = "DB_PASSWORD", hide_env_values = true)]
    pub db_password: Option<String>,

    /// Database name
    #[arg(long, env = "DB_NAME")]
    pub db_name: Option<String>,

    /// Session time zone
    #[arg(long, env = "TZ", default_value = "Asia/Vientiane")]
    pub timezone: String,

    /// Listen port
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
}

impl Args {
    /// Connection options for the permission store. TLS is not negotiated.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .options([("TimeZone", self.timezone.as_str())]);
        if let Some(user) = &self.db_user {
            options = options.username(user);
        }
        if let Some(password) = &self.db_password {
            options = options.password(password);
        }
        if let Some(name) = &self.db_name {
            options = options.database(name);
        }
        options
    }
}

/// Settings read from the configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Role middleware settings.
    pub authorization: AuthorizationSettings,
}

impl Settings {
    /// Load from `path`, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Ok(toml::from_str(&content)?)
            }
            None => Ok(Self::default()),
        }
    }
}

/// The `[authorization]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorizationSettings {
    /// Header carrying the caller id.
    pub header: String,
    /// Permission rows per page.
    pub page_size: usize,
    /// Per-query timeout in milliseconds; absent means unbounded.
    pub query_timeout_ms: Option<u64>,
    /// Paths that bypass authorization.
    pub skip_paths: Vec<String>,
}

impl Default for AuthorizationSettings {
    fn default() -> Self {
        Self {
            header: "userId".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            query_timeout_ms: Some(5000),
            skip_paths: vec!["/greeting".to_string()],
        }
    }
}

impl AuthorizationSettings {
    /// Middleware configuration.
    pub fn role_config(&self) -> Result<RoleConfig> {
        let header = HeaderName::from_bytes(self.header.as_bytes())
            .map_err(|_| Error::InvalidHeader(self.header.clone()))?;
        Ok(RoleConfig::default()
            .with_header(header)
            .with_page_size(self.page_size))
    }

    /// Store configuration.
    pub fn store_config(&self) -> PostgresStoreConfig {
        PostgresStoreConfig {
            query_timeout: self.query_timeout_ms.map(Duration::from_millis),
            ..Default::default()
        }
    }

    /// Bypass predicate.
    pub fn skipper(&self) -> SkipPaths {
        SkipPaths::new(self.skip_paths.iter().cloned())
    }
}
