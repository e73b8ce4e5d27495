use std::fmt;

use autopilot_core::{JobStatus, Preset, PresetId, ProjectId, QueueEntry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    JobSubmitted {
        project_id: ProjectId,
    },
    SubmitFailed {
        error: ApiError,
    },
    StatusObserved {
        project_id: ProjectId,
        status: JobStatus,
    },
    StatusPollFailed {
        project_id: ProjectId,
        error: ApiError,
    },
    /// A job poll loop exited.
    PollStopped {
        project_id: ProjectId,
        outcome: PollOutcome,
    },
    QueueLoaded(QueueSnapshot),
    QueueRequestFailed {
        error: ApiError,
    },
    QueuePollFailed {
        error: ApiError,
    },
    Dequeued {
        project_id: ProjectId,
    },
    BatchStarted,
    BatchStartFailed {
        error: ApiError,
    },
    PresetsLoaded(Vec<Preset>),
    PresetSaved,
    PresetDeleted {
        preset_id: PresetId,
    },
    PresetRequestFailed {
        error: ApiError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Job reached `done`.
    Done,
    /// Job reached `error`.
    Failed,
    /// Queue count reached zero.
    Drained,
    /// Loop was cancelled before a terminal observation.
    Cancelled,
}

/// The engine thread has exited; no further events will arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("engine stopped")]
pub struct EngineStopped;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QueueSnapshot {
    pub entries: Vec<QueueEntry>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ApiError {
    pub kind: FailureKind,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Short text suitable for an alert.
    pub fn user_message(&self) -> String {
        match self.kind {
            FailureKind::Rejected => self.message.clone(),
            _ => self.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidBaseUrl,
    HttpStatus(u16),
    Timeout,
    Network,
    /// Response body was not the expected JSON.
    Decode,
    /// Backend answered but refused the request (`status != "ok"`).
    Rejected,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Decode => write!(f, "unexpected response"),
            FailureKind::Rejected => write!(f, "rejected"),
        }
    }
}
