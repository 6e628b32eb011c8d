//! Command-line and environment configuration for the server binary.
//!
//! Every setting can come from a flag or from its environment variable. A
//! database is optional: without one the planning tools run on the in-memory
//! store and the SQL tools are not registered.

use clap::Parser;
use thiserror::Error;

/// Default `PostgreSQL` port used with component settings.
pub const DEFAULT_DATABASE_PORT: u16 = 5432;

/// Default maximum number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 4;

/// Errors raised while resolving configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Some, but not all, of the required component settings were given.
    #[error("incomplete database settings: missing {}", .0.join(", "))]
    IncompleteDatabaseSettings(Vec<&'static str>),

    /// The pool cannot hold any connection.
    #[error("pool size must be at least 1")]
    EmptyPool,
}

/// Settings for the `mcp_planner` binary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "mcp_planner", version, about = "MCP planning tool server over stdio")]
pub struct PlannerConfig {
    /// Full `PostgreSQL` connection URL; takes precedence over component settings.
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Database host.
    #[arg(long, env = "DATABASE_HOST")]
    pub database_host: Option<String>,

    /// Database port.
    #[arg(long, env = "DATABASE_PORT")]
    pub database_port: Option<u16>,

    /// Database user.
    #[arg(long, env = "DATABASE_USER")]
    pub database_user: Option<String>,

    /// Database password.
    #[arg(long, env = "DATABASE_PASSWORD", hide_env_values = true)]
    pub database_password: Option<String>,

    /// Database name.
    #[arg(long, env = "DATABASE_NAME")]
    pub database_name: Option<String>,

    /// Maximum number of pooled connections.
    #[arg(long, env = "PLANNER_POOL_SIZE")]
    pub pool_size: Option<u32>,

    /// `tracing` filter directive, e.g. `info` or `mcp_planner=debug`.
    #[arg(long, env = "PLANNER_LOG")]
    pub log_filter: Option<String>,
}

/// Where planning records live and whether SQL tools are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Process-local store; SQL tools are not registered.
    InMemory,
    /// `PostgreSQL` through a pooled connection.
    Postgres {
        /// Connection string accepted by libpq.
        url: String,
        /// Maximum number of pooled connections.
        pool_size: u32,
    },
}

impl PlannerConfig {
    /// Returns the log filter, defaulting to `info`.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }

    /// Resolves the storage backend.
    ///
    /// A URL wins over component settings. Component settings need host,
    /// user, and database name; the password is optional and the port
    /// defaults to 5432.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when component settings are partial or the
    /// pool size is zero.
    pub fn storage(&self) -> Result<StorageConfig, ConfigError> {
        let pool_size = self.pool_size.unwrap_or(DEFAULT_POOL_SIZE);
        if pool_size == 0 {
            return Err(ConfigError::EmptyPool);
        }
        if let Some(url) = self.database_url.as_deref().filter(|url| !url.trim().is_empty()) {
            return Ok(StorageConfig::Postgres {
                url: url.to_owned(),
                pool_size,
            });
        }
        match self.component_url()? {
            Some(url) => Ok(StorageConfig::Postgres { url, pool_size }),
            None => Ok(StorageConfig::InMemory),
        }
    }

    fn component_url(&self) -> Result<Option<String>, ConfigError> {
        let required = [
            ("DATABASE_HOST", self.database_host.as_deref()),
            ("DATABASE_USER", self.database_user.as_deref()),
            ("DATABASE_NAME", self.database_name.as_deref()),
        ];
        let missing: Vec<&'static str> = required
            .iter()
            .filter(|(_, value)| value.is_none_or(|text| text.trim().is_empty()))
            .map(|(name, _)| *name)
            .collect();
        let anything_given = missing.len() < required.len()
            || self.database_port.is_some()
            || self.database_password.is_some();
        if !anything_given {
            return Ok(None);
        }
        if !missing.is_empty() {
            return Err(ConfigError::IncompleteDatabaseSettings(missing));
        }

        let port = self.database_port.unwrap_or(DEFAULT_DATABASE_PORT).to_string();
        let mut pairs = vec![
            ("host", self.database_host.as_deref().unwrap_or_default()),
            ("port", port.as_str()),
            ("user", self.database_user.as_deref().unwrap_or_default()),
            ("dbname", self.database_name.as_deref().unwrap_or_default()),
        ];
        if let Some(password) = self.database_password.as_deref() {
            pairs.push(("password", password));
        }
        let conninfo = pairs
            .into_iter()
            .map(|(key, value)| format!("{key}={}", quote_conninfo_value(value)))
            .collect::<Vec<_>>()
            .join(" ");
        Ok(Some(conninfo))
    }
}

/// Quotes a libpq keyword value, escaping backslashes and single quotes.
fn quote_conninfo_value(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for character in value.chars() {
        if matches!(character, '\'' | '\\') {
            quoted.push('\\');
        }
        quoted.push(character);
    }
    quoted.push('\'');
    quoted
}
