use std::time::{Duration, Instant};

use autopilot_core::{Effect, Msg};
use autopilot_engine::{EngineCommand, EngineEvent, EngineHandle, EngineStopped, PollOutcome};
use autopilot_logging::autopilot_info;

/// Navigation scheduled by a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRedirect {
    pub path: String,
    pub due: Instant,
}

pub struct EffectRunner {
    engine: EngineHandle,
    redirect: Option<PendingRedirect>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            redirect: None,
        }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ScheduleRedirect { path, delay } => {
                    autopilot_info!("Redirect to {} scheduled in {:?}", path, delay);
                    self.redirect = Some(PendingRedirect {
                        path,
                        due: Instant::now() + delay,
                    });
                }
                other => {
                    if let Some(command) = to_command(other) {
                        self.engine.execute(command);
                    }
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine result.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineStopped> {
        Ok(self.engine.recv_timeout(timeout)?.and_then(to_msg))
    }

    pub fn shutdown(&self) {
        self.engine.execute(EngineCommand::Shutdown);
    }

    pub fn pending_redirect(&self) -> Option<&PendingRedirect> {
        self.redirect.as_ref()
    }
}

fn to_command(effect: Effect) -> Option<EngineCommand> {
    let command = match effect {
        Effect::SubmitJob { config } => EngineCommand::SubmitJob(Box::new(config)),
        Effect::StartPolling { project_id } => EngineCommand::StartPolling(project_id),
        Effect::StopPolling { project_id } => EngineCommand::StopPolling(project_id),
        Effect::FetchPresets => EngineCommand::FetchPresets,
        Effect::SavePreset { name, settings } => EngineCommand::SavePreset { name, settings },
        Effect::DeletePreset { preset_id } => EngineCommand::DeletePreset(preset_id),
        Effect::FetchQueue => EngineCommand::FetchQueue,
        Effect::DequeueProject { project_id } => EngineCommand::Dequeue(project_id),
        Effect::StartBatch => EngineCommand::StartBatch,
        Effect::StartQueuePolling => EngineCommand::StartQueuePolling,
        Effect::StopQueuePolling => EngineCommand::StopQueuePolling,
        Effect::ScheduleRedirect { .. } => return None,
    };
    Some(command)
}

fn to_msg(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::JobSubmitted { project_id } => Msg::JobSubmitted { project_id },
        EngineEvent::SubmitFailed { error } => Msg::JobSubmitFailed {
            message: error.user_message(),
        },
        EngineEvent::StatusObserved { project_id, status } => {
            Msg::StatusObserved { project_id, status }
        }
        EngineEvent::StatusPollFailed { project_id, error } => Msg::StatusPollFailed {
            project_id,
            message: error.user_message(),
        },
        EngineEvent::PollStopped {
            project_id,
            outcome,
        } => {
            if outcome == PollOutcome::Cancelled {
                autopilot_info!("Stopped watching project {}", project_id);
            }
            return None;
        }
        EngineEvent::QueueLoaded(snapshot) => Msg::QueueLoaded {
            entries: snapshot.entries,
            count: snapshot.count,
        },
        EngineEvent::QueueRequestFailed { error } => Msg::QueueRequestFailed {
            message: error.user_message(),
        },
        EngineEvent::QueuePollFailed { error } => Msg::QueuePollFailed {
            message: error.user_message(),
        },
        EngineEvent::Dequeued { project_id } => Msg::Dequeued { project_id },
        EngineEvent::BatchStarted => Msg::BatchStarted,
        EngineEvent::BatchStartFailed { error } => Msg::BatchStartFailed {
            message: error.user_message(),
        },
        EngineEvent::PresetsLoaded(presets) => Msg::PresetsLoaded(presets),
        EngineEvent::PresetSaved => Msg::PresetSaved,
        EngineEvent::PresetDeleted { preset_id } => Msg::PresetDeleted { preset_id },
        EngineEvent::PresetRequestFailed { error } => Msg::PresetRequestFailed {
            message: error.user_message(),
        },
    };
    Some(msg)
}
