use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub token: Option<String>,
    pub rate_limit_ms: u64,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.brawlstars.com/v1".to_string(),
            token: None,
            rate_limit_ms: 100, // 10 req/sec
            user_agent: "ScrimTracker/1.0",
            timeout_secs: 30,
        }
    }
}

impl ApiSettings {
    pub fn require_token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("BS_API_TOKEN is not set")
    }
}

#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub interval: Duration,
    /// Games older than this at scan time are ignored
    pub recency_window: Duration,
    pub report_interval: Duration,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10 * 60),
            recency_window: Duration::from_secs(600),
            report_interval: Duration::from_secs(168 * 60 * 60),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StatsSettings {
    pub default_top_n: usize,
    pub max_top_n: usize,
    pub compact_cap: usize,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            default_top_n: 15,
            max_top_n: 25,
            compact_cap: 20,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub database_path: String,
    pub emotes_path: PathBuf,
    pub report_archive_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: "scrim_tracker.db".to_string(),
            emotes_path: PathBuf::from("brawlers.json"),
            report_archive_dir: PathBuf::from("reports"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub scan: ScanSettings,
    pub stats: StatsSettings,
    pub storage: StorageSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            api: ApiSettings::default(),
            scan: ScanSettings::default(),
            stats: StatsSettings::default(),
            storage: StorageSettings::default(),
        }
    }

    /// Defaults overridden by environment variables (after loading `dis.env` / `.env`)
    pub fn from_env() -> Self {
        load_env_files();

        let mut config = Self::new();
        config.api.token = env::var("BS_API_TOKEN").ok().filter(|t| !t.is_empty());
        if let Ok(url) = env::var("BS_API_BASE_URL") {
            config.api.base_url = url.trim_end_matches('/').to_string();
        }
        if let Ok(path) = env::var("DATABASE_PATH") {
            config.storage.database_path = path;
        }
        if let Ok(path) = env::var("BRAWLER_EMOTES_PATH") {
            config.storage.emotes_path = PathBuf::from(path);
        }
        if let Ok(dir) = env::var("REPORT_ARCHIVE_DIR") {
            config.storage.report_archive_dir = PathBuf::from(dir);
        }
        config
    }
}

fn load_env_files() {
    // A missing file is fine; variables may come from the process environment.
    let _ = dotenvy::from_filename("dis.env");
    let _ = dotenvy::dotenv();
}
