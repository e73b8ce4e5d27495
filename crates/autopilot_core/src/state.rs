use std::time::Duration;

use crate::locale::{status_label, text, Locale, Text};
use crate::view_model::{AppViewModel, PresetRowView};
use crate::{JobConfig, JobStatus, Preset, PresetId, ProjectId, QueueEntry};

pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_REDIRECT_PATH: &str = "/video-gen";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSettings {
    pub locale: Locale,
    pub redirect_delay: Duration,
    pub redirect_path: String,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            locale: Locale::default(),
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            redirect_path: DEFAULT_REDIRECT_PATH.to_string(),
        }
    }
}

/// Lifecycle of the single job this controller drives.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Polling {
        project_id: ProjectId,
        last_status: Option<JobStatus>,
    },
    Done {
        project_id: ProjectId,
    },
    Failed {
        project_id: ProjectId,
    },
}

impl Phase {
    /// A job is in flight; launching again must be a no-op.
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Submitting | Phase::Polling { .. })
    }

    pub fn project_id(&self) -> Option<ProjectId> {
        match self {
            Phase::Polling { project_id, .. }
            | Phase::Done { project_id }
            | Phase::Failed { project_id } => Some(*project_id),
            Phase::Idle | Phase::Submitting => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchPhase {
    #[default]
    Idle,
    Starting,
    Draining {
        last_count: usize,
    },
    Completed,
}

impl BatchPhase {
    pub fn is_busy(&self) -> bool {
        matches!(self, BatchPhase::Starting | BatchPhase::Draining { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    /// Input rejected before anything was sent.
    Validation,
    /// A remote call failed or was rejected.
    Remote,
    /// The job itself ended in `error`.
    JobFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    settings: ControllerSettings,
    draft: JobConfig,
    phase: Phase,
    batch: BatchPhase,
    presets: Vec<Preset>,
    presets_revision: u64,
    selected_preset: Option<PresetId>,
    queue: Vec<QueueEntry>,
    queue_count: Option<usize>,
    alert: Option<Alert>,
    activity: Vec<String>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: ControllerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &ControllerSettings {
        &self.settings
    }

    pub fn locale(&self) -> Locale {
        self.settings.locale
    }

    pub fn draft(&self) -> &JobConfig {
        &self.draft
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn batch(&self) -> BatchPhase {
        self.batch
    }

    pub fn view(&self) -> AppViewModel {
        let (progress, status_text) = match &self.phase {
            Phase::Idle => (0, String::new()),
            Phase::Submitting | Phase::Polling { last_status: None, .. } => {
                (0, text(Text::PreparingJob, self.locale()).to_string())
            }
            Phase::Polling {
                last_status: Some(status),
                ..
            } => (status.progress(), status_label(status, self.locale()).into_owned()),
            Phase::Done { .. } => (
                JobStatus::Done.progress(),
                status_label(&JobStatus::Done, self.locale()).into_owned(),
            ),
            Phase::Failed { .. } => (
                JobStatus::Error.progress(),
                status_label(&JobStatus::Error, self.locale()).into_owned(),
            ),
        };

        AppViewModel {
            phase: self.phase.clone(),
            project_id: self.phase.project_id(),
            progress,
            status_text,
            can_launch: !self.phase.is_busy(),
            batch: self.batch,
            queue: self.queue.clone(),
            queue_count: self.queue_count,
            presets: self
                .presets
                .iter()
                .map(|preset| PresetRowView {
                    id: preset.id,
                    name: preset.name.clone(),
                    selected: self.selected_preset == Some(preset.id),
                })
                .collect(),
            presets_revision: self.presets_revision,
            alert: self.alert.clone(),
        }
    }

    /// Returns whether anything changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Activity lines appended since the last drain, oldest first.
    pub fn drain_activity(&mut self) -> Vec<String> {
        std::mem::take(&mut self.activity)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn draft_mut(&mut self) -> &mut JobConfig {
        self.mark_dirty();
        &mut self.draft
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn set_batch(&mut self, batch: BatchPhase) {
        self.batch = batch;
        self.mark_dirty();
    }

    pub(crate) fn set_alert(&mut self, kind: AlertKind, message: impl Into<String>) {
        self.alert = Some(Alert {
            kind,
            message: message.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn clear_alert(&mut self) {
        if self.alert.take().is_some() {
            self.mark_dirty();
        }
    }

    pub(crate) fn push_activity(&mut self, line: impl Into<String>) {
        self.activity.push(line.into());
        self.mark_dirty();
    }

    pub(crate) fn presets(&self) -> &[Preset] {
        &self.presets
    }

    pub(crate) fn set_presets(&mut self, presets: Vec<Preset>) {
        if let Some(selected) = self.selected_preset {
            if !presets.iter().any(|preset| preset.id == selected) {
                self.selected_preset = None;
            }
        }
        self.presets = presets;
        self.presets_revision += 1;
        self.mark_dirty();
    }

    pub(crate) fn selected_preset(&self) -> Option<PresetId> {
        self.selected_preset
    }

    pub(crate) fn select_preset(&mut self, preset_id: Option<PresetId>) {
        self.selected_preset = preset_id;
        self.mark_dirty();
    }

    pub(crate) fn queue_count(&self) -> Option<usize> {
        self.queue_count
    }

    pub(crate) fn set_queue(&mut self, entries: Vec<QueueEntry>, count: usize) {
        self.queue = entries;
        self.queue_count = Some(count);
        self.mark_dirty();
    }
}
