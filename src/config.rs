//! Settings for extraction, batch scans and logging, read from a TOML file.
//!
//! Every field has a default, so an empty file (or no file at all) yields a usable config.

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub extract: ExtractConfig,
    pub batch: BatchConfig,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self { extract: ExtractConfig::default(), batch: BatchConfig::default(), log_filter: "info".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub read_covers: bool,
    /// Pictures larger than this are never selected as the cover.
    pub max_cover_bytes: Option<usize>,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self { read_covers: true, max_cover_bytes: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker threads. Defaults to the number of CPUs.
    pub threads: Option<usize>,
    pub extensions: Vec<String>,
    pub follow_links: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            threads: None,
            extensions: ["mp3", "m4a", "m4b", "mp4", "flac", "opus", "ogg", "oga", "wav"].iter().map(|s| s.to_string()).collect(),
            follow_links: false,
        }
    }
}

impl BatchConfig {
    pub fn thread_count(&self) -> usize {
        self.threads.filter(|&n| n > 0).unwrap_or_else(num_cpus::get)
    }

    pub fn accepts_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// `<config dir>/tagcanon/config.toml`, when the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tagcanon").join("config.toml"))
}

impl Config {
    /// Reads the config at `path`, or at the default location when `path` is `None`. A missing file at
    /// the default location is not an error.
    pub fn parse(path: Option<&Path>) -> Result<Config, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match default_config_path() {
                Some(p) if p.exists() => p,
                _ => {
                    debug!("No config file found, using defaults");
                    return Ok(Config::default());
                }
            },
        };
        let contents = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read { path: path.clone(), source })?;
        let config = toml::from_str(&contents).map_err(|source| ConfigError::Decode { path: path.clone(), source })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
