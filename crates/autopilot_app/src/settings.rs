use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use autopilot_core::{ControllerSettings, Locale, DEFAULT_REDIRECT_DELAY, DEFAULT_REDIRECT_PATH};
use autopilot_engine::{ApiSettings, PollSettings, DEFAULT_POLL_INTERVAL};
use autopilot_logging::{autopilot_info, autopilot_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_FILENAME: &str = "autopilot.ron";

/// Contents of `autopilot.ron`. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub poll_interval_ms: u64,
    pub redirect_delay_ms: u64,
    pub redirect_path: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub locale: Locale,
}

impl Default for Settings {
    fn default() -> Self {
        let api = ApiSettings::default();
        Self {
            base_url: api.base_url,
            poll_interval_ms: millis(DEFAULT_POLL_INTERVAL),
            redirect_delay_ms: millis(DEFAULT_REDIRECT_DELAY),
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
            connect_timeout_ms: millis(api.connect_timeout),
            request_timeout_ms: millis(api.request_timeout),
            locale: Locale::default(),
        }
    }
}

impl Settings {
    /// Command-line values win over the file.
    pub fn with_overrides(mut self, base_url: Option<String>, locale: Option<Locale>) -> Self {
        if let Some(base_url) = base_url {
            self.base_url = base_url;
        }
        if let Some(locale) = locale {
            self.locale = locale;
        }
        self
    }

    pub fn api(&self) -> ApiSettings {
        ApiSettings {
            base_url: self.base_url.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn poll(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
        }
    }

    pub fn controller(&self) -> ControllerSettings {
        ControllerSettings {
            locale: self.locale,
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
            redirect_path: self.redirect_path.clone(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Reads the settings file. `Ok(None)` means there is no file.
pub fn read_settings(path: &Path) -> Result<Option<Settings>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Like [`read_settings`], but falls back to defaults on any problem.
pub fn load_settings(path: &Path) -> Settings {
    match read_settings(path) {
        Ok(Some(settings)) => {
            autopilot_info!("Loaded settings from {:?}", path);
            settings
        }
        Ok(None) => Settings::default(),
        Err(err) => {
            autopilot_warn!("{}; using defaults", err);
            Settings::default()
        }
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
