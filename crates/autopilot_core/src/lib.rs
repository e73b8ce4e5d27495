//! Autopilot core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod job_config;
mod locale;
mod msg;
mod preset;
mod queue;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use job_config::{
    duration_from_form, duration_to_form, CreationMode, JobConfig, Mode, SceneCount,
    SubtitleSettings, UploadOptions, UploadPrivacy, ValidationError, DEFAULT_SCENE_COUNT,
};
pub use locale::{status_label, text, Locale, Text};
pub use msg::Msg;
pub use preset::{Preset, PresetId, PresetSettings};
pub use queue::QueueEntry;
pub use state::{
    Alert, AlertKind, AppState, BatchPhase, ControllerSettings, Phase, DEFAULT_REDIRECT_DELAY,
    DEFAULT_REDIRECT_PATH,
};
pub use status::{JobStatus, ProjectId, PROCESSING_PLACEHOLDER, UNKNOWN_PROGRESS};
pub use update::update;
pub use view_model::{AppViewModel, PresetRowView};
