use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use autopilot_core::{JobConfig, PresetId, PresetSettings, ProjectId};
use autopilot_logging::{autopilot_info, autopilot_warn};
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, ReqwestApi, WorkflowApi};
use crate::poll::{poll_job, poll_queue, ChannelEventSink, EventSink, PollSettings};
use crate::{ApiError, EngineEvent, EngineStopped};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    SubmitJob(Box<JobConfig>),
    StartPolling(ProjectId),
    StopPolling(ProjectId),
    FetchQueue,
    Dequeue(ProjectId),
    StartBatch,
    StartQueuePolling,
    StopQueuePolling,
    FetchPresets,
    SavePreset {
        name: String,
        settings: PresetSettings,
    },
    DeletePreset(PresetId),
    /// Cancels every loop and ends the engine thread.
    Shutdown,
}

/// Runs remote calls and poll loops on a background tokio runtime.
///
/// Commands go in through [`EngineHandle::execute`]; results come back as
/// [`EngineEvent`]s in the order they happen.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn connect(api: &ApiSettings, poll: PollSettings) -> Result<Self, ApiError> {
        let api = ReqwestApi::new(api)?;
        Ok(Self::new(Arc::new(api), poll))
    }

    pub fn new(api: Arc<dyn WorkflowApi>, poll: PollSettings) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = Runtime::new().expect("tokio runtime");
            let mut dispatcher = Dispatcher {
                api,
                poll,
                sink: Arc::new(ChannelEventSink::new(event_tx)),
                job_poll: None,
                queue_poll: None,
            };
            while let Ok(command) = cmd_rx.recv() {
                let last = matches!(command, EngineCommand::Shutdown);
                dispatcher.handle(&runtime, command);
                if last {
                    break;
                }
            }
            dispatcher.cancel_all();
        });

        Self { cmd_tx, event_rx }
    }

    pub fn execute(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }

    /// Waits up to `timeout` for the next event. `Ok(None)` means nothing
    /// arrived in time.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<Option<EngineEvent>, EngineStopped> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineStopped),
        }
    }
}

struct Dispatcher {
    api: Arc<dyn WorkflowApi>,
    poll: PollSettings,
    sink: Arc<ChannelEventSink>,
    job_poll: Option<(ProjectId, CancellationToken)>,
    queue_poll: Option<CancellationToken>,
}

impl Dispatcher {
    fn handle(&mut self, runtime: &Runtime, command: EngineCommand) {
        let api = self.api.clone();
        let sink = self.sink.clone();
        match command {
            EngineCommand::SubmitJob(config) => {
                runtime.spawn(async move {
                    let event = match api.start_job(&config).await {
                        Ok(project_id) => {
                            autopilot_info!("Job submitted project_id={}", project_id);
                            EngineEvent::JobSubmitted { project_id }
                        }
                        Err(error) => {
                            autopilot_warn!("Job submission failed: {}", error);
                            EngineEvent::SubmitFailed { error }
                        }
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::StartPolling(project_id) => {
                // One job loop per engine.
                if let Some((previous, token)) = self.job_poll.take() {
                    autopilot_info!("Replacing poll loop for project {}", previous);
                    token.cancel();
                }
                let token = CancellationToken::new();
                self.job_poll = Some((project_id, token.clone()));
                let settings = self.poll.clone();
                runtime.spawn(async move {
                    let outcome =
                        poll_job(api.as_ref(), project_id, &settings, &token, sink.as_ref()).await;
                    sink.emit(EngineEvent::PollStopped {
                        project_id,
                        outcome,
                    });
                });
            }
            EngineCommand::StopPolling(project_id) => {
                if matches!(&self.job_poll, Some((current, _)) if *current == project_id) {
                    if let Some((_, token)) = self.job_poll.take() {
                        token.cancel();
                    }
                }
            }
            EngineCommand::FetchQueue => {
                runtime.spawn(async move {
                    let event = match api.queue().await {
                        Ok(snapshot) => EngineEvent::QueueLoaded(snapshot),
                        Err(error) => EngineEvent::QueueRequestFailed { error },
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::Dequeue(project_id) => {
                runtime.spawn(async move {
                    let event = match api.dequeue(project_id).await {
                        Ok(()) => EngineEvent::Dequeued { project_id },
                        Err(error) => EngineEvent::QueueRequestFailed { error },
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::StartBatch => {
                runtime.spawn(async move {
                    let event = match api.start_batch().await {
                        Ok(()) => EngineEvent::BatchStarted,
                        Err(error) => EngineEvent::BatchStartFailed { error },
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::StartQueuePolling => {
                if let Some(token) = self.queue_poll.take() {
                    token.cancel();
                }
                let token = CancellationToken::new();
                self.queue_poll = Some(token.clone());
                let settings = self.poll.clone();
                runtime.spawn(async move {
                    poll_queue(api.as_ref(), &settings, &token, sink.as_ref()).await;
                });
            }
            EngineCommand::StopQueuePolling => {
                if let Some(token) = self.queue_poll.take() {
                    token.cancel();
                }
            }
            EngineCommand::FetchPresets => {
                runtime.spawn(async move {
                    let event = match api.list_presets().await {
                        Ok(presets) => EngineEvent::PresetsLoaded(presets),
                        Err(error) => EngineEvent::PresetRequestFailed { error },
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::SavePreset { name, settings } => {
                runtime.spawn(async move {
                    let event = match api.save_preset(&name, &settings).await {
                        Ok(()) => EngineEvent::PresetSaved,
                        Err(error) => EngineEvent::PresetRequestFailed { error },
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::DeletePreset(preset_id) => {
                runtime.spawn(async move {
                    let event = match api.delete_preset(preset_id).await {
                        Ok(()) => EngineEvent::PresetDeleted { preset_id },
                        Err(error) => EngineEvent::PresetRequestFailed { error },
                    };
                    sink.emit(event);
                });
            }
            EngineCommand::Shutdown => {
                autopilot_info!("Engine shutting down");
                self.cancel_all();
            }
        }
    }

    fn cancel_all(&mut self) {
        if let Some((_, token)) = self.job_poll.take() {
            token.cancel();
        }
        if let Some(token) = self.queue_poll.take() {
            token.cancel();
        }
    }
}
