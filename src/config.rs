use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::ChallengeFilter;
use crate::catalog::challenge::{Difficulty, Language};
use crate::engine::geometry::Geometry;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Rows per code line in the overlay; must match the code renderer.
    #[serde(default = "default_line_height")]
    pub line_height: u32,
    #[serde(default = "default_min_region_height")]
    pub min_region_height: u32,
    /// Input poll interval. The countdown always runs at 1 Hz regardless.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_challenge_dir")]
    pub challenge_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "dracula".to_string()
}
fn default_line_height() -> u32 {
    1
}
fn default_min_region_height() -> u32 {
    1
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_challenge_dir() -> String {
    config_root()
        .join("challenges")
        .to_string_lossy()
        .to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

fn config_root() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pocketpr")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            line_height: default_line_height(),
            min_region_height: default_min_region_height(),
            tick_rate_ms: default_tick_rate_ms(),
            difficulty: None,
            language: None,
            challenge_dir: default_challenge_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn config_path() -> PathBuf {
        config_root().join("config.toml")
    }

    pub fn geometry(&self) -> Geometry {
        Geometry::new(self.line_height, self.min_region_height)
    }

    /// Unknown difficulty/language keys are treated as "any".
    pub fn challenge_filter(&self) -> ChallengeFilter {
        ChallengeFilter {
            difficulty: self.difficulty.as_deref().and_then(Difficulty::from_key),
            language: self.language.as_deref().and_then(Language::from_key),
        }
    }
}
