use serde::{Deserialize, Serialize};

use crate::{JobStatus, ProjectId};

/// A project parked server-side for batch execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEntry {
    pub id: ProjectId,
    #[serde(default)]
    pub topic: Option<String>,
    pub status: JobStatus,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl QueueEntry {
    pub fn is_queued(&self) -> bool {
        self.status.as_str() == "queued"
    }
}
