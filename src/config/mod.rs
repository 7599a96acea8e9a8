use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::tui::ThemeConfig;

const DEFAULT_CONFIG: &str = r#"# taskboard configuration

[board]
# Artificial latency of each page load, in milliseconds.
page_latency_ms = 1000
# Event-loop poll interval, in milliseconds.
tick_rate_ms = 100
# Name attached to comments written from the detail view.
sender_name = "Current User"

[fixtures]
task_count = 100
comments_per_task = 2
# seed = 42

# [theme]
# hover_row = "rgb(60,40,20)"
"#;

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub board: BoardConfig,
    #[serde(default)]
    pub fixtures: FixtureConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BoardConfig {
    /// Delay before a requested page becomes visible. Default: 1000
    #[serde(default = "default_page_latency_ms")]
    pub page_latency_ms: u64,

    /// How long the event loop waits for input before redrawing. Default: 100
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,

    /// Sender recorded on new comments. Default: "Current User"
    #[serde(default = "default_sender_name")]
    pub sender_name: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            page_latency_ms: default_page_latency_ms(),
            tick_rate_ms: default_tick_rate_ms(),
            sender_name: default_sender_name(),
        }
    }
}

impl BoardConfig {
    pub fn page_latency(&self) -> Duration {
        Duration::from_millis(self.page_latency_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FixtureConfig {
    #[serde(default = "default_task_count")]
    pub task_count: usize,

    #[serde(default = "default_comments_per_task")]
    pub comments_per_task: usize,

    /// Fixed seed for reproducible boards. Default: none (random each run)
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FixtureConfig {
    fn default() -> Self {
        FixtureConfig {
            task_count: default_task_count(),
            comments_per_task: default_comments_per_task(),
            seed: None,
        }
    }
}

fn default_page_latency_ms() -> u64 {
    1000
}

fn default_tick_rate_ms() -> u64 {
    100
}

fn default_sender_name() -> String {
    "Current User".to_string()
}

fn default_task_count() -> usize {
    100
}

fn default_comments_per_task() -> usize {
    2
}

/// Returns the base taskboard directory: ~/.taskboard/
pub fn base_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("could not determine home directory")?;
    Ok(home.join(".taskboard"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("config.toml"))
}

/// Returns the path of the log file (the TUI owns the terminal).
pub fn log_path() -> Result<PathBuf> {
    Ok(base_dir()?.join("taskboard.log"))
}

pub fn ensure_dirs() -> Result<()> {
    let base = base_dir()?;
    fs::create_dir_all(&base).context("failed to create ~/.taskboard/")?;
    Ok(())
}

/// Write the commented default config unless one already exists.
/// Returns whether a file was written.
pub fn write_default(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(true)
}

/// Load config from ~/.taskboard/config.toml (or return defaults if it doesn't exist)
pub fn load() -> Result<Config> {
    load_from(&config_path()?)
}

pub fn load_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    parse(&content).with_context(|| format!("failed to parse {}", path.display()))
}

pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str(content)?)
}
