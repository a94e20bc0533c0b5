use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use directories::ProjectDirs;
use anyhow::{Context, Result};
use std::fs;
use crate::executor::ShellKind;

pub const CACHE_FILE_NAME: &str = "installed_cache.json";
pub const LOG_FILE_NAME: &str = "choco_plugin.log";

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub actions: ActionConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    #[serde(default = "default_package_manager")]
    pub package_manager: String,
    #[serde(default)]
    pub shell: ShellKind,
}

fn default_package_manager() -> String { "choco".to_string() }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            package_manager: default_package_manager(),
            shell: ShellKind::default(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CacheConfig {
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

fn default_ttl_secs() -> u64 { 3600 }

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_ttl_secs(),
            path: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ActionConfig {
    /// Pause between spawning install/uninstall and re-listing installed packages.
    #[serde(default = "default_refresh_delay_ms")]
    pub refresh_delay_ms: u64,
}

fn default_refresh_delay_ms() -> u64 { 2000 }

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            refresh_delay_ms: default_refresh_delay_ms(),
        }
    }
}

impl ActionConfig {
    pub fn refresh_delay(&self) -> Duration {
        Duration::from_millis(self.refresh_delay_ms)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_info_workers")]
    pub info_workers: usize,
    #[serde(default = "default_description_limit")]
    pub description_limit: usize,
}

fn default_info_workers() -> usize { 4 }
fn default_description_limit() -> usize { 60 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            info_workers: default_info_workers(),
            description_limit: default_description_limit(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct LogConfig {
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String { "info".to_string() }

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            path: None,
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn cache_path(&self) -> PathBuf {
        self.cache.path.clone().unwrap_or_else(|| plugin_dir().join(CACHE_FILE_NAME))
    }

    pub fn log_path(&self) -> PathBuf {
        self.log.path.clone().unwrap_or_else(|| plugin_dir().join(LOG_FILE_NAME))
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.ttl_secs)
    }
}

/// Directory holding the plugin executable; the cache and log live beside it.
pub fn plugin_dir() -> PathBuf {
    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    if let Some(dir) = exe_dir {
        return dir;
    }

    match ProjectDirs::from("org", "choco-flow", "choco-flow") {
        Some(dirs) => {
            let data_dir = dirs.data_dir();
            let _ = fs::create_dir_all(data_dir);
            data_dir.to_path_buf()
        }
        None => PathBuf::from("."),
    }
}

pub fn default_config_path() -> PathBuf {
    match ProjectDirs::from("org", "choco-flow", "choco-flow") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config_path = match path {
        Some(path) => path.to_path_buf(),
        None => default_config_path(),
    };

    if !config_path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("reading config {}", config_path.display()))?;
    let config: Config = toml::from_str(&content)
        .with_context(|| format!("parsing config {}", config_path.display()))?;
    Ok(config)
}
