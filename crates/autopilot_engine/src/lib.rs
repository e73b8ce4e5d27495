//! Autopilot engine: backend calls, poll loops and effect execution.
mod api;
mod engine;
mod poll;
mod types;
mod wire;

pub use api::{ApiSettings, ReqwestApi, WorkflowApi};
pub use engine::{EngineCommand, EngineHandle};
pub use poll::{
    poll_job, poll_queue, ChannelEventSink, EventSink, PollSettings, DEFAULT_POLL_INTERVAL,
};
pub use types::{ApiError, EngineEvent, EngineStopped, FailureKind, PollOutcome, QueueSnapshot};
