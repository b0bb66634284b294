use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::calendar::builder::DEFAULT_KEY_EVENTS;
use crate::calendar::{DateFormat, ViewMode};

pub const APP_DIR: &str = "econ-calendar";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("config lists no years to choose from")]
    NoYears,
}

/// `config.toml` contents. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub csv_path: Option<PathBuf>,
    pub date_format: DateFormat,
    /// Years offered by the year selector.
    pub years: Vec<i32>,
    pub default_currencies: Vec<String>,
    pub view: ViewMode,
    pub prefix_currency: bool,
    pub classify_key_events: bool,
    pub key_events: Vec<String>,
    pub strict_year_match: bool,
    pub pin_year: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            csv_path: None,
            date_format: DateFormat::DayFirst,
            years: vec![2025, 2026, 2027],
            default_currencies: Vec::new(),
            view: ViewMode::Month,
            prefix_currency: true,
            classify_key_events: false,
            key_events: DEFAULT_KEY_EVENTS.iter().map(|s| s.to_string()).collect(),
            strict_year_match: true,
            pin_year: false,
        }
    }
}

impl Settings {
    /// Load from `path`, or from the default location when `path` is None.
    /// A missing default file gives the defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match config_dir() {
                Some(dir) => (dir.join("config.toml"), false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let settings = Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        if settings.years.is_empty() {
            return Err(ConfigError::NoYears);
        }
        debug!(path = %path.display(), "config loaded");
        Ok(settings)
    }

    fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR))
}

pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|d| d.join(APP_DIR).join("econ-calendar.log"))
}
