use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One approver's task for one visit of a workflow node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    /// Historical records may lack a node id or point at a deleted node.
    #[serde(default)]
    pub node_id: Option<String>,
    pub instance_id: String,
    pub assigned_to: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(
        id: impl Into<String>,
        node_id: impl Into<String>,
        assigned_to: impl Into<String>,
        status: TaskStatus,
    ) -> Self {
        Self {
            id: id.into(),
            node_id: Some(node_id.into()),
            instance_id: String::new(),
            assigned_to: assigned_to.into(),
            status,
            comments: None,
            completed_at: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TaskStatus::Pending
    }

    pub fn tasks_from_json(json: &str) -> Result<Vec<Task>, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    #[serde(alias = "completed")]
    Approved,
    Rejected,
    Skipped,
}

impl TaskStatus {
    /// Approved, rejected and skipped tasks never change again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::Pending)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "pending"),
            TaskStatus::Approved => write!(f, "approved"),
            TaskStatus::Rejected => write!(f, "rejected"),
            TaskStatus::Skipped => write!(f, "skipped"),
        }
    }
}
