//! JSON bodies exchanged with the workflow backend.

use autopilot_core::{
    CreationMode, JobConfig, Mode, PresetId, PresetSettings, ProjectId, QueueEntry, SceneCount,
    SubtitleSettings, UploadPrivacy,
};
use serde::{Deserialize, Serialize};

/// Flat body of `POST /api/autopilot/start`.
#[derive(Debug, Serialize)]
pub(crate) struct StartJobRequest<'a> {
    keyword: String,
    mode: Mode,
    image_style: &'a str,
    thumbnail_style: &'a str,
    video_scene_count: u32,
    all_video: bool,
    motion_method: &'a str,
    video_engine: &'a str,
    script_style: &'a str,
    voice_provider: &'a str,
    voice_id: &'a str,
    duration_seconds: u32,
    subtitle_settings: Option<&'a SubtitleSettings>,
    preset_id: Option<PresetId>,
    upload_privacy: UploadPrivacy,
    upload_schedule_at: Option<&'a str>,
    youtube_channel_id: Option<u64>,
    creation_mode: CreationMode,
    product_url: &'a str,
}

impl<'a> From<&'a JobConfig> for StartJobRequest<'a> {
    fn from(config: &'a JobConfig) -> Self {
        let (video_scene_count, all_video) = match config.scene_count {
            SceneCount::Fixed(count) => (count, false),
            SceneCount::All => (0, true),
        };
        let upload_schedule_at = match config.upload.privacy {
            UploadPrivacy::Scheduled => config.upload.schedule_at.as_deref(),
            _ => None,
        };
        Self {
            keyword: config.wire_keyword(),
            mode: config.mode,
            image_style: &config.image_style,
            thumbnail_style: &config.thumbnail_style,
            video_scene_count,
            all_video,
            motion_method: &config.motion_method,
            video_engine: &config.video_engine,
            script_style: &config.script_style,
            voice_provider: &config.voice_provider,
            voice_id: &config.voice_id,
            duration_seconds: config.duration_seconds,
            subtitle_settings: config.subtitle_settings.as_ref(),
            preset_id: config.preset_id,
            upload_privacy: config.upload.privacy,
            upload_schedule_at,
            youtube_channel_id: config.upload.channel_id,
            creation_mode: config.creation_mode,
            product_url: config.product_url.trim(),
        }
    }
}

/// Generic `{status, error}` envelope; extra fields are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct StatusEnvelope {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartJobResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub project_id: Option<ProjectId>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectFullResponse {
    #[serde(default)]
    pub project: Option<ProjectSummary>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProjectSummary {
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueueResponse {
    #[serde(default)]
    pub projects: Vec<QueueEntry>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PresetListResponse {
    #[serde(default)]
    pub presets: Vec<RawPreset>,
}

/// Preset as stored; `settings` is decoded separately so one malformed
/// blob does not hide the rest of the list.
#[derive(Debug, Deserialize)]
pub(crate) struct RawPreset {
    pub id: PresetId,
    pub name: String,
    #[serde(default)]
    pub settings: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct SavePresetRequest<'a> {
    pub name: &'a str,
    pub settings: &'a PresetSettings,
}

#[derive(Debug, Serialize)]
pub(crate) struct StatusPatch<'a> {
    pub status: &'a str,
}
