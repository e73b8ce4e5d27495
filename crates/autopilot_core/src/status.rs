use std::fmt;

use serde::{Deserialize, Serialize};

pub type ProjectId = u64;

/// Remote job status. The pipeline is linear; `Error` is absorbing and
/// reachable from any step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Created,
    Analyzing,
    Analyzed,
    Planning,
    Planned,
    Scripting,
    Scripted,
    GeneratingAssets,
    GeneratingThumbnail,
    Rendering,
    Done,
    Error,
    /// Anything the backend reports that is not part of the pipeline,
    /// including the `queued` parking status.
    Unknown(String),
}

/// Placeholder reported when a status response carries no status at all.
pub const PROCESSING_PLACEHOLDER: &str = "processing";

/// Progress shown for statuses outside the pipeline.
pub const UNKNOWN_PROGRESS: u8 = 10;

impl JobStatus {
    /// Pipeline order, `Created` first and `Done` last.
    pub const PIPELINE: [JobStatus; 11] = [
        JobStatus::Created,
        JobStatus::Analyzing,
        JobStatus::Analyzed,
        JobStatus::Planning,
        JobStatus::Planned,
        JobStatus::Scripting,
        JobStatus::Scripted,
        JobStatus::GeneratingAssets,
        JobStatus::GeneratingThumbnail,
        JobStatus::Rendering,
        JobStatus::Done,
    ];

    pub fn parse(raw: &str) -> Self {
        match raw {
            "created" => JobStatus::Created,
            "analyzing" => JobStatus::Analyzing,
            "analyzed" => JobStatus::Analyzed,
            "planning" => JobStatus::Planning,
            "planned" => JobStatus::Planned,
            "scripting" => JobStatus::Scripting,
            "scripted" => JobStatus::Scripted,
            "generating_assets" => JobStatus::GeneratingAssets,
            "generating_thumbnail" => JobStatus::GeneratingThumbnail,
            "rendering" => JobStatus::Rendering,
            "done" => JobStatus::Done,
            "error" => JobStatus::Error,
            other => JobStatus::Unknown(other.to_string()),
        }
    }

    pub fn processing() -> Self {
        JobStatus::Unknown(PROCESSING_PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Created => "created",
            JobStatus::Analyzing => "analyzing",
            JobStatus::Analyzed => "analyzed",
            JobStatus::Planning => "planning",
            JobStatus::Planned => "planned",
            JobStatus::Scripting => "scripting",
            JobStatus::Scripted => "scripted",
            JobStatus::GeneratingAssets => "generating_assets",
            JobStatus::GeneratingThumbnail => "generating_thumbnail",
            JobStatus::Rendering => "rendering",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
            JobStatus::Unknown(raw) => raw,
        }
    }

    /// Fixed progress percentage for this status.
    pub fn progress(&self) -> u8 {
        match self {
            JobStatus::Created => 5,
            JobStatus::Analyzing => 15,
            JobStatus::Analyzed => 25,
            JobStatus::Planning => 35,
            JobStatus::Planned => 45,
            JobStatus::Scripting => 55,
            JobStatus::Scripted => 65,
            JobStatus::GeneratingAssets => 75,
            JobStatus::GeneratingThumbnail => 85,
            JobStatus::Rendering => 95,
            JobStatus::Done => 100,
            JobStatus::Error => 0,
            JobStatus::Unknown(_) => UNKNOWN_PROGRESS,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl From<String> for JobStatus {
    fn from(raw: String) -> Self {
        JobStatus::parse(&raw)
    }
}

impl From<&str> for JobStatus {
    fn from(raw: &str) -> Self {
        JobStatus::parse(raw)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
