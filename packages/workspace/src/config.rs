use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_CONFIG_NAME: &str = "pagekit.config.json";

/// Pagekit server configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory holding one JSON file per project. In-memory when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,

    /// Debounce window for editor autosave
    #[serde(default = "default_autosave_ms")]
    pub autosave_ms: u64,

    /// Bearer token -> user id
    #[serde(default)]
    pub tokens: HashMap<String, String>,

    /// Default tracing filter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3030
}

fn default_autosave_ms() -> u64 {
    2000
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_path = cwd.as_ref().join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn autosave_window(&self) -> Duration {
        Duration::from_millis(self.autosave_ms)
    }

    /// Absolute data directory, resolved against `cwd`.
    pub fn data_dir(&self, cwd: impl AsRef<Path>) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| cwd.as_ref().join(dir))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: None,
            autosave_ms: default_autosave_ms(),
            tokens: HashMap::new(),
            log_level: None,
        }
    }
}
