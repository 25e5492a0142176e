use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory name under the platform config/data dirs
pub const APP_DIR: &str = "composr-tui";

/// A Docker engine to list containers from
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Name shown in the host column and used for host grouping
    pub name: String,
    /// `unix:///path/docker.sock`, `tcp://host:2375` or `http://host:2375`
    pub url: String,
}

/// Dashboard settings from config.yaml
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_compose_dir")]
    pub compose_dir: PathBuf,
    #[serde(default)]
    pub extra_compose_dirs: Vec<PathBuf>,
    /// Remote engines in addition to the local socket
    #[serde(default)]
    pub hosts: Vec<HostConfig>,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
    #[serde(default = "default_search_debounce")]
    pub search_debounce_ms: u64,
    #[serde(default = "default_tick")]
    pub tick_ms: u64,
}

fn default_compose_dir() -> PathBuf {
    PathBuf::from("/app/projects")
}

fn default_refresh_interval() -> u64 {
    30
}

fn default_search_debounce() -> u64 {
    300
}

fn default_tick() -> u64 {
    250
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            compose_dir: default_compose_dir(),
            extra_compose_dirs: Vec::new(),
            hosts: Vec::new(),
            refresh_interval_secs: default_refresh_interval(),
            search_debounce_ms: default_search_debounce(),
            tick_ms: default_tick(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .context(format!("Failed to read config: {:?}", path.as_ref()))?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty file is valid and means "all defaults"
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings =
            serde_yaml::from_str(content).context("Failed to parse config YAML")?;
        Ok(settings)
    }

    /// Load from the default location, falling back to defaults when the
    /// file does not exist, then apply environment overrides
    pub fn load_default() -> Result<Self> {
        let mut settings = match config_path() {
            Some(path) if path.exists() => Self::load(&path)?,
            _ => Self::default(),
        };
        settings.apply_env(
            std::env::var("COMPOSE_DIR").ok(),
            std::env::var("EXTRA_COMPOSE_DIRS").ok(),
        );
        Ok(settings)
    }

    /// `COMPOSE_DIR` replaces the compose root, `EXTRA_COMPOSE_DIRS` is a
    /// colon separated list of additional directories
    pub fn apply_env(&mut self, compose_dir: Option<String>, extra_dirs: Option<String>) {
        if let Some(dir) = compose_dir.filter(|d| !d.trim().is_empty()) {
            self.compose_dir = PathBuf::from(dir);
        }
        if let Some(extra) = extra_dirs {
            self.extra_compose_dirs = extra
                .split(':')
                .filter(|d| !d.trim().is_empty())
                .map(PathBuf::from)
                .collect();
        }
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs.max(1))
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(10))
    }
}

/// `<config dir>/composr-tui/config.yaml`
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join("config.yaml"))
}

/// `<data dir>/composr-tui`, home of the preference store and the log file
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join(APP_DIR))
}
