use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use autopilot_core::{
    update, AppState, AppViewModel, BatchPhase, ControllerSettings, JobConfig, Msg, Phase,
    PresetId, ProjectId,
};
use autopilot_engine::{EngineHandle, EngineStopped};
use autopilot_logging::{autopilot_debug, autopilot_info};
use chrono::Local;

use crate::cli::{Cli, Command, JobArgs, PresetCommand, QueueCommand, WatchArgs};
use crate::effects::EffectRunner;
use crate::render::{preset_lines, queue_lines, Renderer};
use crate::settings::load_settings;

/// How long one loop iteration waits for an engine event.
const EVENT_WAIT: Duration = Duration::from_millis(100);

pub fn run(cli: Cli) -> Result<ExitCode> {
    let settings = load_settings(&cli.config).with_overrides(cli.base_url, cli.locale);
    autopilot_info!(
        "Backend {} poll every {} ms",
        settings.base_url,
        settings.poll_interval_ms
    );

    let engine = EngineHandle::connect(&settings.api(), settings.poll())
        .context("cannot use the configured backend")?;
    let mut session = Session::new(settings.controller(), EffectRunner::new(engine));

    let code = match cli.command {
        Command::Launch { job, preset, watch } => launch(&mut session, &job, preset, watch),
        Command::Monitor { project_id, watch } => monitor(&mut session, project_id, watch),
        Command::Batch => batch(&mut session),
        Command::Queue(QueueCommand::List) => list_queue(&mut session),
        Command::Queue(QueueCommand::Remove { project_id }) => dequeue(&mut session, project_id),
        Command::Presets(PresetCommand::List) => list_presets(&mut session),
        Command::Presets(PresetCommand::Save { name, job }) => save_preset(&mut session, name, &job),
        Command::Presets(PresetCommand::Delete { preset_id }) => {
            delete_preset(&mut session, preset_id)
        }
    }
    .context("lost the background engine")?;
    session.shutdown();
    Ok(code)
}

/// Owns the controller state and drives it with engine results.
pub struct Session {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
}

impl Session {
    pub fn new(settings: ControllerSettings, runner: EffectRunner) -> Self {
        Self {
            state: AppState::with_settings(settings),
            runner,
            renderer: Renderer::default(),
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        autopilot_debug!("dispatch {:?}", msg);
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let activity = state.drain_activity();
            for line in self.renderer.render(&state.view(), activity, Local::now()) {
                println!("{line}");
            }
        }
        self.state = state;
        self.runner.enqueue(effects);
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn draft(&self) -> &JobConfig {
        self.state.draft()
    }

    /// Feeds engine results into the controller until `check` yields a
    /// value. Returns `Ok(None)` if `deadline` passes first.
    pub fn run_until<T>(
        &mut self,
        deadline: Option<Instant>,
        mut check: impl FnMut(&AppViewModel) -> Option<T>,
    ) -> Result<Option<T>, EngineStopped> {
        loop {
            if let Some(result) = check(&self.view()) {
                return Ok(Some(result));
            }
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                return Ok(None);
            }
            if let Some(msg) = self.runner.next_msg(EVENT_WAIT)? {
                self.dispatch(msg);
            }
        }
    }

    /// Waits until `ready` holds. Returns `false` if an error alert shows
    /// up first.
    fn wait_for(
        &mut self,
        ready: impl Fn(&AppViewModel) -> bool,
    ) -> Result<bool, EngineStopped> {
        let ready = self.run_until(None, |view| {
            if ready(view) {
                Some(true)
            } else if has_error(view) {
                Some(false)
            } else {
                None
            }
        })?;
        Ok(ready.unwrap_or(false))
    }

    pub fn shutdown(&self) {
        self.runner.shutdown();
    }

    fn follow_redirect(&self) {
        let Some(redirect) = self.runner.pending_redirect() else {
            return;
        };
        let remaining = redirect.due.saturating_duration_since(Instant::now());
        thread::sleep(remaining);
        autopilot_info!("Redirecting to {}", redirect.path);
        println!("-> {}", redirect.path);
    }
}

fn has_error(view: &AppViewModel) -> bool {
    view.alert.is_some()
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Sends the job flags through the same messages the form would.
fn edit_draft(session: &mut Session, job: &JobArgs) {
    if let Some(mode) = job.mode() {
        session.dispatch(Msg::ModeSelected(mode));
    }
    if let Some(creation_mode) = job.creation_mode() {
        session.dispatch(Msg::CreationModeSelected(creation_mode));
    }
    let mut draft = session.draft().clone();
    job.apply_fields(&mut draft);
    session.dispatch(Msg::DraftReplaced(draft));
}

fn launch(
    session: &mut Session,
    job: &JobArgs,
    preset: Option<PresetId>,
    watch_args: WatchArgs,
) -> Result<ExitCode, EngineStopped> {
    if let Some(preset_id) = preset {
        session.dispatch(Msg::PresetsRequested);
        if !session.wait_for(|view| view.presets_revision > 0)? {
            return Ok(ExitCode::FAILURE);
        }
        session.dispatch(Msg::PresetSelected(Some(preset_id)));
        if has_error(&session.view()) {
            return Ok(ExitCode::FAILURE);
        }
    }

    edit_draft(session, job);
    session.dispatch(Msg::LaunchClicked);
    if has_error(&session.view()) {
        return Ok(ExitCode::FAILURE);
    }
    watch(session, watch_args)
}

fn monitor(
    session: &mut Session,
    project_id: ProjectId,
    watch_args: WatchArgs,
) -> Result<ExitCode, EngineStopped> {
    session.dispatch(Msg::MonitorRequested { project_id });
    watch(session, watch_args)
}

/// Follows the current job to a terminal phase or until the user's
/// detach deadline.
fn watch(session: &mut Session, watch_args: WatchArgs) -> Result<ExitCode, EngineStopped> {
    let deadline = watch_args
        .detach_after
        .map(|secs| Instant::now() + Duration::from_secs(secs));

    let finished = session.run_until(deadline, |view| match view.phase {
        Phase::Done { .. } => Some(true),
        Phase::Failed { .. } | Phase::Idle => Some(false),
        Phase::Submitting | Phase::Polling { .. } => None,
    })?;

    let code = match finished {
        Some(true) => {
            session.follow_redirect();
            ExitCode::SUCCESS
        }
        Some(false) => ExitCode::FAILURE,
        None => {
            session.dispatch(Msg::DismissRequested { confirmed: true });
            ExitCode::SUCCESS
        }
    };
    Ok(code)
}

fn refresh_queue(session: &mut Session) -> Result<bool, EngineStopped> {
    session.dispatch(Msg::QueueRefreshRequested);
    session.wait_for(|view| view.queue_count.is_some())
}

fn print_queue(session: &Session) {
    let view = session.view();
    let locale = session.state.locale();
    for line in queue_lines(&view.queue, view.queue_count.unwrap_or(0), locale) {
        println!("{line}");
    }
}

fn batch(session: &mut Session) -> Result<ExitCode, EngineStopped> {
    if !refresh_queue(session)? {
        return Ok(ExitCode::FAILURE);
    }
    print_queue(session);

    session.dispatch(Msg::BatchStartClicked);
    let completed = session.run_until(None, |view| match view.batch {
        BatchPhase::Completed => Some(true),
        BatchPhase::Idle => Some(false),
        BatchPhase::Starting | BatchPhase::Draining { .. } => None,
    })?;
    Ok(exit_code(completed == Some(true)))
}

fn list_queue(session: &mut Session) -> Result<ExitCode, EngineStopped> {
    if !refresh_queue(session)? {
        return Ok(ExitCode::FAILURE);
    }
    print_queue(session);
    Ok(ExitCode::SUCCESS)
}

fn dequeue(session: &mut Session, project_id: ProjectId) -> Result<ExitCode, EngineStopped> {
    session.dispatch(Msg::DequeueClicked { project_id });
    // A successful dequeue refetches the queue.
    let ok = session.wait_for(|view| view.queue_count.is_some())?;
    if ok {
        print_queue(session);
    }
    Ok(exit_code(ok))
}

fn load_presets(session: &mut Session) -> Result<bool, EngineStopped> {
    session.dispatch(Msg::PresetsRequested);
    session.wait_for(|view| view.presets_revision > 0)
}

fn list_presets(session: &mut Session) -> Result<ExitCode, EngineStopped> {
    if !load_presets(session)? {
        return Ok(ExitCode::FAILURE);
    }
    for line in preset_lines(&session.view().presets) {
        println!("{line}");
    }
    Ok(ExitCode::SUCCESS)
}

fn save_preset(
    session: &mut Session,
    name: String,
    job: &JobArgs,
) -> Result<ExitCode, EngineStopped> {
    edit_draft(session, job);
    session.dispatch(Msg::PresetSaveClicked { name });
    if has_error(&session.view()) {
        return Ok(ExitCode::FAILURE);
    }
    // Saving refetches the list.
    Ok(exit_code(session.wait_for(|view| view.presets_revision > 0)?))
}

fn delete_preset(session: &mut Session, preset_id: PresetId) -> Result<ExitCode, EngineStopped> {
    if !load_presets(session)? {
        return Ok(ExitCode::FAILURE);
    }
    session.dispatch(Msg::PresetSelected(Some(preset_id)));
    if has_error(&session.view()) {
        return Ok(ExitCode::FAILURE);
    }
    let revision = session.view().presets_revision;
    session.dispatch(Msg::PresetDeleteClicked);
    Ok(exit_code(session.wait_for(|view| view.presets_revision > revision)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use autopilot_core::{JobStatus, Locale, Preset, PresetSettings};
    use autopilot_engine::{ApiError, FailureKind, PollSettings, QueueSnapshot, WorkflowApi};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct FakeBackend {
        submitted: Mutex<Vec<JobConfig>>,
        statuses: Mutex<VecDeque<JobStatus>>,
        counts: Mutex<VecDeque<usize>>,
        reject_start: bool,
    }

    fn next_or_last<T: Clone>(items: &Mutex<VecDeque<T>>, fallback: T) -> T {
        let mut items = items.lock().unwrap();
        if items.len() > 1 {
            items.pop_front().unwrap()
        } else {
            items.front().cloned().unwrap_or(fallback)
        }
    }

    #[async_trait::async_trait]
    impl WorkflowApi for FakeBackend {
        async fn start_job(&self, config: &JobConfig) -> Result<ProjectId, ApiError> {
            if self.reject_start {
                return Err(ApiError::new(FailureKind::Rejected, "quota exceeded"));
            }
            self.submitted.lock().unwrap().push(config.clone());
            Ok(42)
        }

        async fn project_status(&self, _project_id: ProjectId) -> Result<JobStatus, ApiError> {
            Ok(next_or_last(&self.statuses, JobStatus::Created))
        }

        async fn queue(&self) -> Result<QueueSnapshot, ApiError> {
            Ok(QueueSnapshot {
                entries: Vec::new(),
                count: next_or_last(&self.counts, 0),
            })
        }

        async fn start_batch(&self) -> Result<(), ApiError> {
            Ok(())
        }

        async fn dequeue(&self, _project_id: ProjectId) -> Result<(), ApiError> {
            Ok(())
        }

        async fn list_presets(&self) -> Result<Vec<Preset>, ApiError> {
            Ok(vec![Preset {
                id: 7,
                name: "Shorts".to_string(),
                settings: PresetSettings {
                    mode: Some(autopilot_core::Mode::Shorts),
                    voice_id: Some("narrator".to_string()),
                    ..PresetSettings::default()
                },
            }])
        }

        async fn save_preset(
            &self,
            _name: &str,
            _settings: &PresetSettings,
        ) -> Result<(), ApiError> {
            Ok(())
        }

        async fn delete_preset(&self, _preset_id: PresetId) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn session_with(backend: Arc<FakeBackend>) -> Session {
        let engine = EngineHandle::new(
            backend,
            PollSettings {
                interval: Duration::from_millis(5),
            },
        );
        let settings = ControllerSettings {
            locale: Locale::En,
            redirect_delay: Duration::from_millis(10),
            ..ControllerSettings::default()
        };
        Session::new(settings, EffectRunner::new(engine))
    }

    fn topic(topic: &str) -> JobArgs {
        JobArgs {
            topic: Some(topic.to_string()),
            ..JobArgs::default()
        }
    }

    #[test]
    fn launch_follows_job_to_done_and_redirects() {
        let backend = Arc::new(FakeBackend {
            statuses: Mutex::new(VecDeque::from(vec![
                JobStatus::Analyzing,
                JobStatus::Scripting,
                JobStatus::Done,
            ])),
            ..FakeBackend::default()
        });
        let mut session = session_with(backend.clone());

        launch(&mut session, &topic("cats"), None, WatchArgs { detach_after: None }).unwrap();

        assert_eq!(session.view().phase, Phase::Done { project_id: 42 });
        assert_eq!(session.view().progress, 100);
        let redirect = session.runner.pending_redirect().expect("redirect scheduled");
        assert_eq!(redirect.path, "/video-gen");

        let submitted = backend.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].topic, "cats");
        assert_eq!(submitted[0].duration_seconds, 600);
    }

    #[test]
    fn empty_topic_never_reaches_the_backend() {
        let backend = Arc::new(FakeBackend::default());
        let mut session = session_with(backend.clone());

        launch(&mut session, &topic("   "), None, WatchArgs { detach_after: None }).unwrap();

        assert_eq!(session.view().phase, Phase::Idle);
        assert!(has_error(&session.view()));
        thread::sleep(Duration::from_millis(20));
        assert!(backend.submitted.lock().unwrap().is_empty());
    }

    #[test]
    fn rejected_launch_returns_to_idle_with_alert() {
        let backend = Arc::new(FakeBackend {
            reject_start: true,
            ..FakeBackend::default()
        });
        let mut session = session_with(backend);

        launch(&mut session, &topic("cats"), None, WatchArgs { detach_after: None }).unwrap();

        let view = session.view();
        assert_eq!(view.phase, Phase::Idle);
        assert_eq!(
            view.alert.map(|alert| alert.message),
            Some("quota exceeded".to_string())
        );
    }

    #[test]
    fn detach_deadline_dismisses_the_monitor() {
        let backend = Arc::new(FakeBackend {
            statuses: Mutex::new(VecDeque::from(vec![JobStatus::Rendering])),
            ..FakeBackend::default()
        });
        let mut session = session_with(backend);

        monitor(&mut session, 9, WatchArgs { detach_after: Some(0) }).unwrap();

        assert_eq!(session.view().phase, Phase::Idle);
        assert!(session.runner.pending_redirect().is_none());
    }

    #[test]
    fn preset_is_applied_before_explicit_flags() {
        let backend = Arc::new(FakeBackend {
            statuses: Mutex::new(VecDeque::from(vec![JobStatus::Done])),
            ..FakeBackend::default()
        });
        let mut session = session_with(backend.clone());

        launch(&mut session, &topic("dogs"), Some(7), WatchArgs { detach_after: None }).unwrap();

        let submitted = backend.submitted.lock().unwrap();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].mode, autopilot_core::Mode::Shorts);
        assert_eq!(submitted[0].voice_id, "narrator");
        assert_eq!(submitted[0].topic, "dogs");
        assert_eq!(submitted[0].preset_id, Some(7));
    }

    #[test]
    fn stopped_engine_ends_the_wait() {
        let backend = Arc::new(FakeBackend {
            statuses: Mutex::new(VecDeque::from(vec![JobStatus::Rendering])),
            ..FakeBackend::default()
        });
        let mut session = session_with(backend);
        session.shutdown();

        let result = monitor(&mut session, 9, WatchArgs { detach_after: None });

        assert!(matches!(result, Err(EngineStopped)));
    }

    #[test]
    fn batch_runs_until_queue_drains() {
        let backend = Arc::new(FakeBackend {
            counts: Mutex::new(VecDeque::from(vec![3, 3, 1, 0])),
            ..FakeBackend::default()
        });
        let mut session = session_with(backend);

        batch(&mut session).unwrap();

        let view = session.view();
        assert_eq!(view.batch, BatchPhase::Completed);
        assert_eq!(view.queue_count, Some(0));
    }
}
