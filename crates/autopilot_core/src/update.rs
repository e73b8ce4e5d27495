use crate::locale::{text, Text};
use crate::{
    AlertKind, AppState, BatchPhase, CreationMode, Effect, JobStatus, Mode, Msg, Phase,
    PresetSettings, ProjectId, ValidationError,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DraftReplaced(config) => {
            *state.draft_mut() = config;
            Vec::new()
        }
        Msg::ModeSelected(mode) => {
            state.draft_mut().set_mode(mode);
            Vec::new()
        }
        Msg::CreationModeSelected(creation_mode) => {
            // Commerce is offered for shorts only.
            if creation_mode == CreationMode::Commerce && state.draft().mode == Mode::Longform {
                return (state, Vec::new());
            }
            state.draft_mut().creation_mode = creation_mode;
            Vec::new()
        }
        Msg::LaunchClicked => launch(&mut state),
        Msg::MonitorRequested { project_id } => {
            if state.phase().is_busy() {
                return (state, Vec::new());
            }
            state.clear_alert();
            state.set_phase(Phase::Polling {
                project_id,
                last_status: None,
            });
            state.push_activity(format!("Monitoring project {project_id}"));
            vec![Effect::StartPolling { project_id }]
        }
        Msg::DismissRequested { confirmed } => match state.phase().clone() {
            Phase::Polling { project_id, .. } if confirmed => {
                state.set_phase(Phase::Idle);
                state.push_activity(text(Text::MonitorDetached, state.locale()));
                vec![Effect::StopPolling { project_id }]
            }
            Phase::Polling { .. } => Vec::new(),
            _ => {
                state.clear_alert();
                Vec::new()
            }
        },
        Msg::JobSubmitted { project_id } => {
            if *state.phase() != Phase::Submitting {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Polling {
                project_id,
                last_status: None,
            });
            state.push_activity(format!("Workflow started. Project ID: {project_id}"));
            vec![Effect::StartPolling { project_id }]
        }
        Msg::JobSubmitFailed { message } => {
            if *state.phase() != Phase::Submitting {
                return (state, Vec::new());
            }
            state.set_phase(Phase::Idle);
            state.push_activity(format!("FAIL: {message}"));
            state.set_alert(AlertKind::Remote, message);
            Vec::new()
        }
        Msg::StatusObserved { project_id, status } => {
            observe_status(&mut state, project_id, status)
        }
        Msg::StatusPollFailed { .. } => Vec::new(),
        Msg::PresetsRequested => vec![Effect::FetchPresets],
        Msg::PresetsLoaded(presets) => {
            state.set_presets(presets);
            Vec::new()
        }
        Msg::PresetSelected(None) => {
            state.select_preset(None);
            state.draft_mut().preset_id = None;
            Vec::new()
        }
        Msg::PresetSelected(Some(preset_id)) => {
            let Some(preset) = state
                .presets()
                .iter()
                .find(|preset| preset.id == preset_id)
                .cloned()
            else {
                let message = text(Text::PresetMissing, state.locale());
                state.set_alert(AlertKind::Validation, message);
                return (state, Vec::new());
            };
            preset.apply_to(state.draft_mut());
            state.select_preset(Some(preset_id));
            state.push_activity(format!("Preset '{}' loaded", preset.name));
            Vec::new()
        }
        Msg::PresetSaveClicked { name } => {
            let name = name.trim();
            if name.is_empty() {
                let message = ValidationError::MissingPresetName.message(state.locale());
                state.set_alert(AlertKind::Validation, message);
                return (state, Vec::new());
            }
            vec![Effect::SavePreset {
                name: name.to_string(),
                settings: PresetSettings::from_config(state.draft()),
            }]
        }
        Msg::PresetSaved => {
            state.push_activity(text(Text::PresetSaved, state.locale()));
            vec![Effect::FetchPresets]
        }
        Msg::PresetDeleteClicked => match state.selected_preset() {
            Some(preset_id) => vec![Effect::DeletePreset { preset_id }],
            None => Vec::new(),
        },
        Msg::PresetDeleted { preset_id } => {
            if state.selected_preset() == Some(preset_id) {
                state.select_preset(None);
                state.draft_mut().preset_id = None;
            }
            state.push_activity(text(Text::PresetDeleted, state.locale()));
            vec![Effect::FetchPresets]
        }
        Msg::PresetRequestFailed { message } | Msg::QueueRequestFailed { message } => {
            state.set_alert(AlertKind::Remote, message);
            Vec::new()
        }
        Msg::QueueRefreshRequested => vec![Effect::FetchQueue],
        Msg::QueueLoaded { entries, count } => {
            state.set_queue(entries, count);
            match state.batch() {
                BatchPhase::Draining { .. } if count == 0 => {
                    state.set_batch(BatchPhase::Completed);
                    state.push_activity(text(Text::BatchFinished, state.locale()));
                    vec![Effect::StopQueuePolling]
                }
                BatchPhase::Draining { last_count } if last_count != count => {
                    state.set_batch(BatchPhase::Draining { last_count: count });
                    state.push_activity(format!("Queue: {count} remaining"));
                    Vec::new()
                }
                _ => Vec::new(),
            }
        }
        Msg::QueuePollFailed { .. } => Vec::new(),
        Msg::DequeueClicked { project_id } => vec![Effect::DequeueProject { project_id }],
        Msg::Dequeued { project_id } => {
            state.push_activity(format!(
                "{} (#{project_id})",
                text(Text::Dequeued, state.locale())
            ));
            vec![Effect::FetchQueue]
        }
        Msg::BatchStartClicked => {
            if state.batch().is_busy() {
                return (state, Vec::new());
            }
            if state.queue_count() == Some(0) {
                let message = text(Text::QueueEmpty, state.locale());
                state.set_alert(AlertKind::Validation, message);
                return (state, Vec::new());
            }
            state.clear_alert();
            state.set_batch(BatchPhase::Starting);
            vec![Effect::StartBatch]
        }
        Msg::BatchStarted => {
            if state.batch() != BatchPhase::Starting {
                return (state, Vec::new());
            }
            let last_count = state.queue_count().unwrap_or(0);
            state.set_batch(BatchPhase::Draining { last_count });
            state.push_activity(text(Text::BatchStarted, state.locale()));
            vec![Effect::StartQueuePolling]
        }
        Msg::BatchStartFailed { message } => {
            if state.batch() != BatchPhase::Starting {
                return (state, Vec::new());
            }
            state.set_batch(BatchPhase::Idle);
            state.set_alert(AlertKind::Remote, message);
            Vec::new()
        }
    };

    (state, effects)
}

fn launch(state: &mut AppState) -> Vec<Effect> {
    if state.phase().is_busy() {
        return Vec::new();
    }
    if let Err(err) = state.draft().validate() {
        let message = err.message(state.locale());
        state.set_alert(AlertKind::Validation, message);
        return Vec::new();
    }

    let config = state.draft().clone();
    state.clear_alert();
    state.set_phase(Phase::Submitting);
    state.push_activity(format!(
        "Mode: {} | Style: {}",
        config.mode, config.image_style
    ));
    state.push_activity(format!(
        "Voice: {} / {}",
        config.voice_provider, config.voice_id
    ));
    vec![Effect::SubmitJob { config }]
}

fn observe_status(
    state: &mut AppState,
    project_id: ProjectId,
    status: JobStatus,
) -> Vec<Effect> {
    let last_status = match state.phase() {
        Phase::Polling {
            project_id: current,
            last_status,
        } if *current == project_id => last_status.clone(),
        // Late result for a job we no longer watch.
        _ => return Vec::new(),
    };

    if last_status.as_ref() != Some(&status) {
        state.push_activity(format!("... Status: {status}"));
    }

    match status {
        JobStatus::Done => {
            state.set_phase(Phase::Done { project_id });
            state.push_activity(text(Text::JobFinished, state.locale()));
            let settings = state.settings();
            vec![
                Effect::StopPolling { project_id },
                Effect::ScheduleRedirect {
                    path: settings.redirect_path.clone(),
                    delay: settings.redirect_delay,
                },
            ]
        }
        JobStatus::Error => {
            let message = text(Text::JobFailed, state.locale());
            state.set_phase(Phase::Failed { project_id });
            state.push_activity(message);
            state.set_alert(AlertKind::JobFailed, message);
            vec![Effect::StopPolling { project_id }]
        }
        status => {
            if last_status.as_ref() != Some(&status) {
                state.set_phase(Phase::Polling {
                    project_id,
                    last_status: Some(status),
                });
            }
            Vec::new()
        }
    }
}
