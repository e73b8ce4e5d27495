use crate::{Alert, BatchPhase, Phase, PresetId, ProjectId, QueueEntry};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: Phase,
    pub project_id: Option<ProjectId>,
    /// Percentage for the progress bar, 0..=100.
    pub progress: u8,
    pub status_text: String,
    pub can_launch: bool,
    pub batch: BatchPhase,
    pub queue: Vec<QueueEntry>,
    /// `None` until the queue has been fetched once.
    pub queue_count: Option<usize>,
    pub presets: Vec<PresetRowView>,
    /// Bumped every time a preset list arrives.
    pub presets_revision: u64,
    pub alert: Option<Alert>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetRowView {
    pub id: PresetId,
    pub name: String,
    pub selected: bool,
}
