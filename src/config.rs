//! Client configuration.
//!
//! Read from `~/.siicop/config.json` when present, then overridden by
//! environment variables. Every remote origin lives here rather than in the
//! service adapters.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_AUTH_URL: &str = "http://98.81.137.170:8000";
pub const DEFAULT_CHAT_URL: &str = "http://54.91.71.240:8005";
pub const DEFAULT_CHAT_USER_ID: &str = "default_user";
pub const DEFAULT_SIMULATED_LATENCY_MS: u64 = 800;

/// Which tender backend the composition root wires in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Mock,
    Live,
}

impl std::str::FromStr for Backend {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mock" => Ok(Backend::Mock),
            "live" => Ok(Backend::Live),
            other => Err(ClientError::Config(format!(
                "backend desconocido '{}' (use 'mock' o 'live')",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Base URL for the generic HTTP primitive.
    #[serde(default = "default_api_url")]
    pub api_base_url: String,
    /// Origin of the auth and company services.
    #[serde(default = "default_auth_url")]
    pub auth_base_url: String,
    /// Origin of the chat assistant.
    #[serde(default = "default_chat_url")]
    pub chat_base_url: String,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_chat_user_id")]
    pub chat_user_id: String,
    /// Latency applied by simulated endpoints (tender mock, company update).
    #[serde(default = "default_latency_ms")]
    pub simulated_latency_ms: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_auth_url() -> String {
    DEFAULT_AUTH_URL.to_string()
}

fn default_chat_url() -> String {
    DEFAULT_CHAT_URL.to_string()
}

fn default_chat_user_id() -> String {
    DEFAULT_CHAT_USER_ID.to_string()
}

fn default_latency_ms() -> u64 {
    DEFAULT_SIMULATED_LATENCY_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_url(),
            auth_base_url: default_auth_url(),
            chat_base_url: default_chat_url(),
            backend: Backend::default(),
            chat_user_id: default_chat_user_id(),
            simulated_latency_ms: default_latency_ms(),
        }
    }
}

impl Config {
    pub fn simulated_latency(&self) -> Duration {
        Duration::from_millis(self.simulated_latency_ms)
    }

    /// Apply environment overrides from an arbitrary lookup.
    ///
    /// `VITE_API_URL` is honored for parity with the web build;
    /// `SIICOP_API_URL` wins when both are set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("SIICOP_API_URL").or_else(|| non_empty("VITE_API_URL")) {
            self.api_base_url = url;
        }
        if let Some(url) = non_empty("SIICOP_AUTH_URL") {
            self.auth_base_url = url;
        }
        if let Some(url) = non_empty("SIICOP_CHAT_URL") {
            self.chat_base_url = url;
        }
        if let Some(backend) = non_empty("SIICOP_BACKEND") {
            self.backend = backend.parse()?;
        }
        if let Some(user_id) = non_empty("SIICOP_CHAT_USER_ID") {
            self.chat_user_id = user_id;
        }
        if let Some(ms) = non_empty("SIICOP_SIMULATED_LATENCY_MS") {
            self.simulated_latency_ms = ms.trim().parse().map_err(|_| {
                ClientError::Config(format!("SIICOP_SIMULATED_LATENCY_MS inválido: {}", ms))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        for (name, value) in [
            ("apiBaseUrl", &self.api_base_url),
            ("authBaseUrl", &self.auth_base_url),
            ("chatBaseUrl", &self.chat_base_url),
        ] {
            url::Url::parse(value)
                .map_err(|e| ClientError::Config(format!("{} inválida '{}': {}", name, value, e)))?;
        }
        Ok(())
    }
}

/// Default config location: `~/.siicop/config.json`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".siicop").join("config.json"))
}

/// Read a config file. Missing fields take their defaults.
pub fn read_config_file(path: &Path) -> Result<Config, ClientError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ClientError::Config(format!("no se pudo leer {}: {}", path.display(), e)))?;
    serde_json::from_str(&content)
        .map_err(|e| ClientError::Config(format!("no se pudo interpretar {}: {}", path.display(), e)))
}

/// Load configuration: file (if it exists), then process environment.
pub fn load_config() -> Result<Config, ClientError> {
    let mut config = match config_path() {
        Some(path) if path.exists() => {
            log::debug!("Loading config from {}", path.display());
            read_config_file(&path)?
        }
        _ => Config::default(),
    };
    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}
