//! Configuration module
//!
//! Config is read from `.kbh/config.toml` (searched upward from the current
//! directory), then `~/.kbh/config.toml`, and falls back to defaults.
//! `KBH_CONFIG` or `--config` point at an explicit file instead.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::core::query::{DEFAULT_POPULAR_LIMIT, DEFAULT_RECENT_LIMIT, DEFAULT_RELATED_LIMIT};

/// Name of the per-project directory
pub const KBH_DIR: &str = ".kbh";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub query: QueryConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

/// Where content comes from
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// JSON dataset file; the builtin seed is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    /// Artificial delay before each backend call, in milliseconds
    #[serde(default)]
    pub latency_ms: u64,
}

impl StoreConfig {
    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }
}

/// Default list sizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    #[serde(default = "default_popular_limit")]
    pub popular_limit: usize,

    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,

    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            popular_limit: default_popular_limit(),
            recent_limit: default_recent_limit(),
            related_limit: default_related_limit(),
        }
    }
}

fn default_popular_limit() -> usize {
    DEFAULT_POPULAR_LIMIT
}

fn default_recent_limit() -> usize {
    DEFAULT_RECENT_LIMIT
}

fn default_related_limit() -> usize {
    DEFAULT_RELATED_LIMIT
}

/// HTTP server settings, and the remote server to query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Remote kbh server URL (e.g., "http://localhost:8080")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Address `kbh serve --transport http` binds to
    #[serde(default = "default_bind")]
    pub bind: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Remote request timeout in seconds
    #[serde(default = "default_server_timeout")]
    pub timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: None,
            bind: default_bind(),
            port: default_port(),
            timeout_secs: default_server_timeout(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_server_timeout() -> u64 {
    30
}

/// UI preference storage
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    /// Preferences file; defaults to `<kbh dir>/prefs.toml`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefs_file: Option<PathBuf>,
}

impl Config {
    /// Load config from the explicit path or from default locations
    pub fn load_with(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }
        Self::load()
    }

    /// Load config from default locations
    pub fn load() -> Result<Self> {
        if let Ok(env_path) = std::env::var("KBH_CONFIG") {
            return Self::load_from(Path::new(&env_path));
        }

        // Try local config first, then global
        if let Some(local) = Self::find_local_config() {
            return Self::load_from(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_from(&global);
            }
        }

        Ok(Self::default())
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;

        // Relative dataset paths are relative to the project root, the
        // parent of the .kbh directory holding the config
        if let Some(dataset) = config.store.dataset.as_mut() {
            if dataset.is_relative() {
                if let Some(base) = path.parent().and_then(|p| p.parent()) {
                    *dataset = base.join(&*dataset);
                }
            }
        }

        Ok(config)
    }

    /// Save config to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Find the nearest .kbh directory walking up from the current directory
    pub fn find_local_dir() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let dir = current.join(KBH_DIR);
            if dir.is_dir() {
                return Some(dir);
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Find local .kbh/config.toml walking up directories
    pub fn find_local_config() -> Option<PathBuf> {
        Self::find_local_dir()
            .map(|dir| dir.join("config.toml"))
            .filter(|path| path.exists())
    }

    /// Global kbh directory (~/.kbh)
    pub fn global_dir() -> Option<PathBuf> {
        directories::UserDirs::new().map(|u| u.home_dir().join(KBH_DIR))
    }

    /// Global config path (~/.kbh/config.toml)
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|d| d.join("config.toml"))
    }

    /// Directory for kbh state with priority:
    /// 1. Local .kbh/ (walking up from CWD)
    /// 2. Global ~/.kbh/
    /// 3. ./.kbh as a last resort
    pub fn data_dir(&self) -> PathBuf {
        Self::find_local_dir()
            .or_else(Self::global_dir)
            .unwrap_or_else(|| PathBuf::from(KBH_DIR))
    }

    /// Preferences file location
    pub fn prefs_path(&self) -> PathBuf {
        self.ui
            .prefs_file
            .clone()
            .unwrap_or_else(|| self.data_dir().join("prefs.toml"))
    }
}
