use super::{Task, TaskStatus};
use crate::error::DecisionError;
use serde::{Deserialize, Serialize};

/// A user's approval inbox: tasks awaiting them and tasks they already handled.
#[derive(Debug, Clone, PartialEq)]
pub struct Inbox {
    pub user_id: String,
    pub pending: Vec<Task>,
    /// Newest decision first; tasks without a completion time go last.
    pub processed: Vec<Task>,
}

impl Inbox {
    pub fn for_user(user_id: &str, tasks: &[Task]) -> Self {
        let (pending, mut processed): (Vec<Task>, Vec<Task>) = tasks
            .iter()
            .filter(|task| task.assigned_to == user_id)
            .cloned()
            .partition(Task::is_pending);
        processed.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Self {
            user_id: user_id.to_string(),
            pending,
            processed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Approve,
    Reject,
}

impl Verdict {
    pub fn task_status(&self) -> TaskStatus {
        match self {
            Verdict::Approve => TaskStatus::Approved,
            Verdict::Reject => TaskStatus::Rejected,
        }
    }
}

/// An approve/reject decision ready to be submitted to the workflow engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalDecision {
    pub task_id: String,
    pub verdict: Verdict,
    pub comments: String,
}

impl ApprovalDecision {
    /// Checks that `user_id` may decide `task` and that comments were given.
    pub fn new(
        task: &Task,
        user_id: &str,
        verdict: Verdict,
        comments: impl Into<String>,
    ) -> Result<Self, DecisionError> {
        let comments = comments.into();
        if comments.trim().is_empty() {
            return Err(DecisionError::MissingComments);
        }
        if !task.is_pending() {
            return Err(DecisionError::TaskNotPending(task.id.clone()));
        }
        if task.assigned_to != user_id {
            return Err(DecisionError::NotAssignee {
                task_id: task.id.clone(),
                user_id: user_id.to_string(),
            });
        }
        Ok(Self {
            task_id: task.id.clone(),
            verdict,
            comments: comments.trim().to_string(),
        })
    }
}
