use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;

use crate::error::{DockhandError, Result};

pub const DEFAULT_USER: &str = "root";
pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_CONTAINER: &str = "web_container";
pub const DEFAULT_APP_PATH: &str = "/app";

/// Server and container settings, resolved once at startup.
///
/// Empty strings mean "not set", same as an absent variable.
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub container: String,
    /// Read for completeness; no command uses it.
    pub app_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: String::new(),
            container: DEFAULT_CONTAINER.to_string(),
            app_path: DEFAULT_APP_PATH.to_string(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.redacted_password())
            .field("container", &self.container)
            .field("app_path", &self.app_path)
            .finish()
    }
}

impl AppConfig {
    /// Load from the process environment, falling back to `./.env`.
    ///
    /// Variables already present in the environment take precedence over
    /// the file. The process environment itself is never modified.
    pub fn load() -> Result<Self> {
        Self::load_with_env_file(Path::new(".env"))
    }

    pub fn load_with_env_file(path: &Path) -> Result<Self> {
        let file_vars = read_env_file(path)?;
        Self::from_sources(|key| std::env::var(key).ok(), &file_vars)
    }

    /// Merge an environment source with `.env` values.
    ///
    /// A variable present in the environment shadows the file even when its
    /// value is empty.
    pub fn from_sources<E>(env_lookup: E, file_vars: &HashMap<String, String>) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| env_lookup(key).or_else(|| file_vars.get(key).cloned()))
    }

    /// Build a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let port = match get("SERVER_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| {
                DockhandError::Config(format!("Invalid SERVER_PORT '{}'", raw))
            })?,
            None => defaults.port,
        };

        Ok(Self {
            host: get("SERVER_HOST").unwrap_or_default(),
            port,
            user: get("SERVER_USER").unwrap_or(defaults.user),
            password: get("SERVER_PASSWORD").unwrap_or_default(),
            container: get("CONTAINER_NAME").unwrap_or(defaults.container),
            app_path: get("APP_PATH").unwrap_or(defaults.app_path),
        })
    }

    /// Check that everything needed to reach the server is present.
    ///
    /// Must pass before any connection attempt.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() || self.password.is_empty() {
            return Err(DockhandError::Config(
                "SERVER_HOST and SERVER_PASSWORD must be set (environment or .env file)"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn redacted_password(&self) -> &'static str {
        if self.password.is_empty() {
            "(not set)"
        } else {
            "********"
        }
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to open {}", path.display()))
                .into())
        }
    };

    let mut vars = HashMap::new();
    for item in iter {
        let (key, value) = item.with_context(|| format!("Failed to parse {}", path.display()))?;
        vars.insert(key, value);
    }

    tracing::debug!("Loaded {} variables from {}", vars.len(), path.display());
    Ok(vars)
}
