use autopilot_core::{
    update, AlertKind, AppState, BatchPhase, Effect, JobStatus, Msg, QueueEntry,
};

fn entries(count: usize) -> Vec<QueueEntry> {
    (1..=count as u64)
        .map(|id| QueueEntry {
            id,
            topic: Some(format!("topic {id}")),
            status: JobStatus::parse("queued"),
            created_at: None,
        })
        .collect()
}

fn queue_loaded(state: AppState, count: usize) -> (AppState, Vec<Effect>) {
    update(
        state,
        Msg::QueueLoaded {
            entries: entries(count),
            count,
        },
    )
}

#[test]
fn queue_drain_stops_exactly_at_zero() {
    let (state, _) = queue_loaded(AppState::new(), 3);
    let (state, effects) = update(state, Msg::BatchStartClicked);
    assert_eq!(effects, vec![Effect::StartBatch]);
    assert_eq!(state.batch(), BatchPhase::Starting);

    let (state, effects) = update(state, Msg::BatchStarted);
    assert_eq!(effects, vec![Effect::StartQueuePolling]);
    assert_eq!(state.batch(), BatchPhase::Draining { last_count: 3 });

    let (state, effects) = queue_loaded(state, 3);
    assert!(effects.is_empty());
    let (state, effects) = queue_loaded(state, 1);
    assert!(effects.is_empty());
    assert_eq!(state.batch(), BatchPhase::Draining { last_count: 1 });

    let (state, effects) = queue_loaded(state, 0);
    assert_eq!(effects, vec![Effect::StopQueuePolling]);
    assert_eq!(state.batch(), BatchPhase::Completed);
    assert_eq!(state.view().queue_count, Some(0));

    // A later refresh does not restart or stop anything.
    let (state, effects) = queue_loaded(state, 0);
    assert!(effects.is_empty());
    assert_eq!(state.batch(), BatchPhase::Completed);
}

#[test]
fn batch_start_is_ignored_while_running() {
    let (state, _) = queue_loaded(AppState::new(), 2);
    let (state, _) = update(state, Msg::BatchStartClicked);
    let (state, effects) = update(state, Msg::BatchStartClicked);
    assert!(effects.is_empty());

    let (state, _) = update(state, Msg::BatchStarted);
    let (_state, effects) = update(state, Msg::BatchStartClicked);
    assert!(effects.is_empty());
}

#[test]
fn empty_queue_blocks_batch_start() {
    let (state, _) = queue_loaded(AppState::new(), 0);
    let (state, effects) = update(state, Msg::BatchStartClicked);

    assert!(effects.is_empty());
    assert_eq!(state.batch(), BatchPhase::Idle);
    assert_eq!(state.view().alert.unwrap().kind, AlertKind::Validation);
}

#[test]
fn failed_batch_start_returns_to_idle() {
    let (state, _) = update(AppState::new(), Msg::BatchStartClicked);
    let (state, effects) = update(
        state,
        Msg::BatchStartFailed {
            message: "http status 502".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.batch(), BatchPhase::Idle);
    assert_eq!(state.view().alert.unwrap().kind, AlertKind::Remote);

    let (_state, effects) = update(state, Msg::BatchStartClicked);
    assert_eq!(effects, vec![Effect::StartBatch]);
}

#[test]
fn queue_poll_failure_is_tolerated() {
    let (state, _) = queue_loaded(AppState::new(), 2);
    let (state, _) = update(state, Msg::BatchStartClicked);
    let (state, _) = update(state, Msg::BatchStarted);
    let (state, effects) = update(
        state,
        Msg::QueuePollFailed {
            message: "timeout".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert_eq!(state.batch(), BatchPhase::Draining { last_count: 2 });
    assert!(state.view().alert.is_none());
}

#[test]
fn dequeue_refreshes_the_queue() {
    let (state, effects) = update(AppState::new(), Msg::DequeueClicked { project_id: 17 });
    assert_eq!(effects, vec![Effect::DequeueProject { project_id: 17 }]);

    let (_state, effects) = update(state, Msg::Dequeued { project_id: 17 });
    assert_eq!(effects, vec![Effect::FetchQueue]);
}
