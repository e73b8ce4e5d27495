use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::locale::{text, Locale, Text};
use crate::PresetId;

/// Nested subtitle style record, passed through to the backend untouched.
pub type SubtitleSettings = BTreeMap<String, serde_json::Value>;

pub const DEFAULT_SCENE_COUNT: u32 = 10;
pub const DEFAULT_LONGFORM_MINUTES: u32 = 10;
pub const DEFAULT_SHORTS_SECONDS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Longform,
    Shorts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreationMode {
    #[default]
    Default,
    Commerce,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadPrivacy {
    #[default]
    Private,
    Unlisted,
    Public,
    Scheduled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCount {
    Fixed(u32),
    All,
}

impl Default for SceneCount {
    fn default() -> Self {
        SceneCount::Fixed(DEFAULT_SCENE_COUNT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UploadOptions {
    pub privacy: UploadPrivacy,
    /// Local datetime string as entered, e.g. `2026-10-20T09:30`.
    pub schedule_at: Option<String>,
    pub channel_id: Option<u64>,
}

/// One production request. Edited as a draft, then snapshotted by value
/// when a job is launched.
#[derive(Debug, Clone, PartialEq)]
pub struct JobConfig {
    pub topic: String,
    pub product_url: String,
    pub mode: Mode,
    pub creation_mode: CreationMode,
    pub image_style: String,
    pub thumbnail_style: String,
    pub scene_count: SceneCount,
    pub motion_method: String,
    pub video_engine: String,
    pub script_style: String,
    pub voice_provider: String,
    pub voice_id: String,
    pub duration_seconds: u32,
    pub subtitle_settings: Option<SubtitleSettings>,
    pub preset_id: Option<PresetId>,
    pub upload: UploadOptions,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            topic: String::new(),
            product_url: String::new(),
            mode: Mode::Longform,
            creation_mode: CreationMode::Default,
            image_style: "realistic".to_string(),
            thumbnail_style: "face".to_string(),
            scene_count: SceneCount::default(),
            motion_method: "standard".to_string(),
            video_engine: "wan".to_string(),
            script_style: "story".to_string(),
            voice_provider: "elevenlabs".to_string(),
            voice_id: "default".to_string(),
            duration_seconds: DEFAULT_LONGFORM_MINUTES * 60,
            subtitle_settings: None,
            preset_id: None,
            upload: UploadOptions::default(),
        }
    }
}

impl JobConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.creation_mode {
            CreationMode::Default if self.topic.trim().is_empty() => {
                Err(ValidationError::MissingTopic)
            }
            CreationMode::Commerce if self.product_url.trim().is_empty() => {
                Err(ValidationError::MissingProductUrl)
            }
            _ => Ok(()),
        }
    }

    /// Keyword sent to the backend. Commerce jobs are keyed by product URL.
    pub fn wire_keyword(&self) -> String {
        match self.creation_mode {
            CreationMode::Default => self.topic.trim().to_string(),
            CreationMode::Commerce => format!("[Commerce] {}", self.product_url.trim()),
        }
    }

    /// Switches mode the way the mode toggle does: commerce is shorts-only,
    /// and the duration input is reset to the new mode's default when it
    /// still reads 60 in the previous mode's unit.
    pub fn set_mode(&mut self, mode: Mode) {
        let previous_form = self.duration_form_value();
        self.mode = mode;
        match mode {
            Mode::Longform => {
                self.creation_mode = CreationMode::Default;
                if previous_form == DEFAULT_SHORTS_SECONDS {
                    self.duration_seconds = DEFAULT_LONGFORM_MINUTES * 60;
                }
            }
            Mode::Shorts => {
                self.duration_seconds = DEFAULT_SHORTS_SECONDS;
            }
        }
    }

    pub fn set_duration_from_form(&mut self, value: Option<u32>) {
        self.duration_seconds = duration_from_form(self.mode, value);
    }

    pub fn duration_form_value(&self) -> u32 {
        duration_to_form(self.mode, self.duration_seconds)
    }
}

/// Converts the duration input (minutes for longform, seconds for shorts)
/// to seconds. Empty or zero input falls back to the mode default.
pub fn duration_from_form(mode: Mode, value: Option<u32>) -> u32 {
    let value = value.filter(|v| *v > 0);
    match mode {
        Mode::Longform => value.unwrap_or(DEFAULT_LONGFORM_MINUTES) * 60,
        Mode::Shorts => value.unwrap_or(DEFAULT_SHORTS_SECONDS),
    }
}

pub fn duration_to_form(mode: Mode, seconds: u32) -> u32 {
    match mode {
        Mode::Longform => (seconds + 30) / 60,
        Mode::Shorts => seconds,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingTopic,
    MissingProductUrl,
    MissingPresetName,
}

impl ValidationError {
    pub fn message(self, locale: Locale) -> &'static str {
        let key = match self {
            ValidationError::MissingTopic => Text::MissingTopic,
            ValidationError::MissingProductUrl => Text::MissingProductUrl,
            ValidationError::MissingPresetName => Text::MissingPresetName,
        };
        text(key, locale)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message(Locale::En))
    }
}

impl std::error::Error for ValidationError {}

macro_rules! lowercase_from_str {
    ($ty:ty { $($name:literal => $variant:expr),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(raw: &str) -> Result<Self, Self::Err> {
                match raw.trim().to_ascii_lowercase().as_str() {
                    $($name => Ok($variant),)+
                    other => Err(format!("unknown value '{other}'")),
                }
            }
        }
    };
}

lowercase_from_str!(Mode {
    "longform" => Mode::Longform,
    "shorts" => Mode::Shorts,
});

lowercase_from_str!(CreationMode {
    "default" => CreationMode::Default,
    "commerce" => CreationMode::Commerce,
});

lowercase_from_str!(UploadPrivacy {
    "private" => UploadPrivacy::Private,
    "unlisted" => UploadPrivacy::Unlisted,
    "public" => UploadPrivacy::Public,
    "scheduled" => UploadPrivacy::Scheduled,
});

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Longform => f.write_str("longform"),
            Mode::Shorts => f.write_str("shorts"),
        }
    }
}
