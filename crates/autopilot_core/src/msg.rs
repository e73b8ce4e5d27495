use crate::{CreationMode, JobConfig, JobStatus, Mode, Preset, PresetId, ProjectId, QueueEntry};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Replace the whole draft configuration (form reloaded or rebuilt).
    DraftReplaced(JobConfig),
    ModeSelected(Mode),
    CreationModeSelected(CreationMode),
    /// User asked to launch the draft as a new job.
    LaunchClicked,
    /// Resume watching a job that was launched earlier.
    MonitorRequested { project_id: ProjectId },
    /// User closed the progress view. Only a confirmed close detaches.
    DismissRequested { confirmed: bool },
    /// Backend accepted the job.
    JobSubmitted { project_id: ProjectId },
    /// Backend rejected the job or could not be reached.
    JobSubmitFailed { message: String },
    /// A poll tick read a status.
    StatusObserved {
        project_id: ProjectId,
        status: JobStatus,
    },
    /// A poll tick failed; the loop keeps going.
    StatusPollFailed {
        project_id: ProjectId,
        message: String,
    },
    PresetsRequested,
    PresetsLoaded(Vec<Preset>),
    /// `None` returns to the custom (unsaved) configuration.
    PresetSelected(Option<PresetId>),
    PresetSaveClicked { name: String },
    PresetSaved,
    PresetDeleteClicked,
    PresetDeleted { preset_id: PresetId },
    PresetRequestFailed { message: String },
    QueueRefreshRequested,
    /// Queue listing arrived, from a manual refresh or the batch poller.
    QueueLoaded {
        entries: Vec<QueueEntry>,
        count: usize,
    },
    QueueRequestFailed { message: String },
    /// A batch poll tick failed; the loop keeps going.
    QueuePollFailed { message: String },
    DequeueClicked { project_id: ProjectId },
    Dequeued { project_id: ProjectId },
    BatchStartClicked,
    BatchStarted,
    BatchStartFailed { message: String },
}
