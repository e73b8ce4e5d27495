use std::sync::mpsc;
use std::time::Duration;

use autopilot_core::{JobStatus, ProjectId};
use autopilot_logging::{autopilot_debug, autopilot_info, autopilot_warn};
use tokio_util::sync::CancellationToken;

use crate::{EngineEvent, PollOutcome, WorkflowApi};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct PollSettings {
    /// Pause between the end of one tick and the start of the next.
    pub interval: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Polls one project until it reports `done` or `error`, or until
/// `cancel` fires.
///
/// Ticks are serialized: the next wait starts only after the previous
/// request has resolved. A failed tick is reported and the loop carries on.
pub async fn poll_job(
    api: &dyn WorkflowApi,
    project_id: ProjectId,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> PollOutcome {
    let mut tick: u64 = 0;
    loop {
        if !wait_for_tick(settings.interval, cancel).await {
            return PollOutcome::Cancelled;
        }
        tick += 1;

        let result = tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            result = api.project_status(project_id) => result,
        };

        match result {
            Ok(status) => {
                autopilot_debug!("Poll project_id={} tick={} status={}", project_id, tick, status);
                let outcome = match status {
                    JobStatus::Done => Some(PollOutcome::Done),
                    JobStatus::Error => Some(PollOutcome::Failed),
                    _ => None,
                };
                sink.emit(EngineEvent::StatusObserved { project_id, status });
                if let Some(outcome) = outcome {
                    autopilot_info!(
                        "Project {} finished after {} ticks: {:?}",
                        project_id,
                        tick,
                        outcome
                    );
                    return outcome;
                }
            }
            Err(error) => {
                autopilot_warn!("Poll project_id={} tick={} failed: {}", project_id, tick, error);
                sink.emit(EngineEvent::StatusPollFailed { project_id, error });
            }
        }
    }
}

/// Polls the batch queue until it is empty, or until `cancel` fires.
pub async fn poll_queue(
    api: &dyn WorkflowApi,
    settings: &PollSettings,
    cancel: &CancellationToken,
    sink: &dyn EventSink,
) -> PollOutcome {
    loop {
        if !wait_for_tick(settings.interval, cancel).await {
            return PollOutcome::Cancelled;
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => return PollOutcome::Cancelled,
            result = api.queue() => result,
        };

        match result {
            Ok(snapshot) => {
                let drained = snapshot.count == 0;
                autopilot_debug!("Queue poll count={}", snapshot.count);
                sink.emit(EngineEvent::QueueLoaded(snapshot));
                if drained {
                    autopilot_info!("Batch queue drained");
                    return PollOutcome::Drained;
                }
            }
            Err(error) => {
                autopilot_warn!("Queue poll failed: {}", error);
                sink.emit(EngineEvent::QueuePollFailed { error });
            }
        }
    }
}

/// Returns `false` if cancelled while waiting.
async fn wait_for_tick(interval: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(interval) => true,
    }
}
