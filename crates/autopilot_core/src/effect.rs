use std::time::Duration;

use crate::{JobConfig, PresetId, PresetSettings, ProjectId};

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    SubmitJob { config: JobConfig },
    StartPolling { project_id: ProjectId },
    StopPolling { project_id: ProjectId },
    /// Navigate to `path` once `delay` has elapsed.
    ScheduleRedirect { path: String, delay: Duration },
    FetchPresets,
    SavePreset {
        name: String,
        settings: PresetSettings,
    },
    DeletePreset { preset_id: PresetId },
    FetchQueue,
    DequeueProject { project_id: ProjectId },
    StartBatch,
    StartQueuePolling,
    StopQueuePolling,
}
