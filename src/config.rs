use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Option<ServerConfig>,
    #[serde(default)]
    pub pusher: Option<PusherConfig>,
    #[serde(default)]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ServerConfig {
    pub bind: Option<String>,
    #[serde(default)]
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub rate_limit: Option<RateLimitConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct RateLimitConfig {
    pub max_requests: Option<u32>,
    pub window_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct PusherConfig {
    pub instance_id: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    pub history_path: Option<String>,
    pub upload_dir: Option<String>,
    pub public_dir: Option<String>,
}

impl Config {
    /// Reads the TOML config at `path` when given, otherwise returns
    /// defaults. Credentials may still arrive via environment variables.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Config> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let raw = std::fs::read_to_string(path)
            .map_err(|err| anyhow::anyhow!("failed to read config {}: {err}", path.display()))?;
        let config = toml::from_str(&raw)
            .map_err(|err| anyhow::anyhow!("failed to parse config {}: {err}", path.display()))?;
        Ok(config)
    }

    /// Public instance id, shown to the front-end. Config value wins,
    /// `PUSHER_INSTANCE_ID` is the fallback.
    pub fn instance_id(&self) -> Option<String> {
        self.pusher
            .as_ref()
            .and_then(|pusher| pusher.instance_id.clone())
            .or_else(|| non_empty_env("PUSHER_INSTANCE_ID"))
    }

    /// Both credentials, or `None` when either is missing. A missing pair
    /// leaves the server running with sends disabled.
    pub fn pusher_credentials(&self) -> Option<(String, String)> {
        let instance_id = self.instance_id()?;
        let secret_key = self
            .pusher
            .as_ref()
            .and_then(|pusher| pusher.secret_key.clone())
            .or_else(|| non_empty_env("PUSHER_SECRET_KEY"))?;
        Some((instance_id, secret_key))
    }

    pub fn bind(&self) -> String {
        self.server
            .as_ref()
            .and_then(|server| server.bind.clone())
            .unwrap_or_else(|| "127.0.0.1:3000".to_string())
    }

    pub fn history_path(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|storage| storage.history_path.clone())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("history.json"))
    }

    pub fn upload_dir(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|storage| storage.upload_dir.clone())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public/uploads"))
    }

    pub fn public_dir(&self) -> PathBuf {
        self.storage
            .as_ref()
            .and_then(|storage| storage.public_dir.clone())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("public"))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}
