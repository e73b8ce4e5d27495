use serde::{Deserialize, Serialize};

use crate::job_config::{
    duration_from_form, CreationMode, JobConfig, Mode, SceneCount, SubtitleSettings,
    UploadPrivacy, DEFAULT_SCENE_COUNT,
};

pub type PresetId = u64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    #[serde(default)]
    pub settings: PresetSettings,
}

impl Preset {
    pub fn apply_to(&self, config: &mut JobConfig) {
        self.settings.apply_to(config);
        config.preset_id = Some(self.id);
    }
}

/// Partial job configuration stored in a preset. Absent fields leave the
/// draft untouched when applied.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresetSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_mode: Option<CreationMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_style: Option<String>,
    /// Older presets stored the image style under this key.
    #[serde(skip_serializing)]
    pub visual_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_scene_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub all_video: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub motion_method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_engine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub script_style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
    /// Duration in form units (minutes for longform, seconds for shorts).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_duration: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle_settings: Option<SubtitleSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_privacy: Option<UploadPrivacy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_schedule_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub youtube_channel_id: Option<u64>,
}

impl PresetSettings {
    /// Snapshot of everything a preset carries. Topic and product URL are
    /// per-job and are not stored.
    pub fn from_config(config: &JobConfig) -> Self {
        let (video_scene_count, all_video) = match config.scene_count {
            SceneCount::Fixed(count) => (count, false),
            SceneCount::All => (DEFAULT_SCENE_COUNT, true),
        };
        Self {
            mode: Some(config.mode),
            creation_mode: None,
            product_url: None,
            image_style: Some(config.image_style.clone()),
            visual_style: None,
            thumbnail_style: Some(config.thumbnail_style.clone()),
            video_scene_count: Some(video_scene_count),
            all_video: Some(all_video),
            motion_method: Some(config.motion_method.clone()),
            video_engine: Some(config.video_engine.clone()),
            script_style: Some(config.script_style.clone()),
            voice_provider: Some(config.voice_provider.clone()),
            voice_id: Some(config.voice_id.clone()),
            duration_seconds: Some(config.duration_seconds),
            target_duration: Some(config.duration_form_value()),
            subtitle_settings: config.subtitle_settings.clone(),
            upload_privacy: Some(config.upload.privacy),
            upload_schedule_at: config.upload.schedule_at.clone(),
            youtube_channel_id: config.upload.channel_id,
        }
    }

    pub fn apply_to(&self, config: &mut JobConfig) {
        if let Some(mode) = self.mode {
            config.set_mode(mode);
        }

        match self.creation_mode {
            Some(creation_mode) => {
                config.creation_mode = creation_mode;
                config.product_url = self.product_url.clone().unwrap_or_default();
            }
            None => config.creation_mode = CreationMode::Default,
        }

        if let Some(style) = self.image_style.as_ref().or(self.visual_style.as_ref()) {
            config.image_style = style.clone();
        }
        if let Some(style) = &self.thumbnail_style {
            config.thumbnail_style = style.clone();
        }

        config.scene_count = match (self.all_video, self.video_scene_count) {
            (Some(true), _) => SceneCount::All,
            (_, Some(count)) => SceneCount::Fixed(count),
            (Some(false), None) if config.scene_count == SceneCount::All => {
                SceneCount::Fixed(DEFAULT_SCENE_COUNT)
            }
            _ => config.scene_count,
        };

        copy_if_set(&mut config.motion_method, &self.motion_method);
        copy_if_set(&mut config.video_engine, &self.video_engine);
        copy_if_set(&mut config.script_style, &self.script_style);
        copy_if_set(&mut config.voice_provider, &self.voice_provider);
        copy_if_set(&mut config.voice_id, &self.voice_id);

        match (self.duration_seconds.filter(|s| *s > 0), self.target_duration) {
            (Some(seconds), _) => config.duration_seconds = seconds,
            (None, Some(form_value)) => {
                config.duration_seconds = duration_from_form(config.mode, Some(form_value));
            }
            (None, None) => {}
        }

        if let Some(subtitles) = &self.subtitle_settings {
            config.subtitle_settings = Some(subtitles.clone());
        }
        if let Some(privacy) = self.upload_privacy {
            config.upload.privacy = privacy;
        }
        if let Some(schedule_at) = &self.upload_schedule_at {
            config.upload.schedule_at = Some(schedule_at.clone());
        }
        if let Some(channel_id) = self.youtube_channel_id {
            config.upload.channel_id = Some(channel_id);
        }
    }
}

fn copy_if_set(target: &mut String, value: &Option<String>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}
