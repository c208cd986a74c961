use super::{Task, TaskStatus};
use serde::Serialize;
use std::fmt;

/// Where a node stands in a running workflow instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeStatus {
    /// Not reached yet, or only skipped tasks.
    Pending,
    /// At least one approver still has to decide.
    Running,
    Completed,
    Rejected,
}

impl NodeStatus {
    /// Folds one task status into the node status.
    ///
    /// | state     | approved  | pending | rejected | skipped   |
    /// |-----------|-----------|---------|----------|-----------|
    /// | pending   | completed | running | rejected | pending   |
    /// | completed | completed | running | rejected | completed |
    /// | running   | running   | running | rejected | running   |
    /// | rejected  | rejected  | rejected| rejected | rejected  |
    ///
    /// The table is order independent, so the fold gives the same answer for any
    /// permutation of the task list.
    pub fn transition(self, task: TaskStatus) -> NodeStatus {
        use NodeStatus::*;
        match (self, task) {
            (Rejected, _) | (_, TaskStatus::Rejected) => Rejected,
            (state, TaskStatus::Skipped) => state,
            (Pending | Completed, TaskStatus::Approved) => Completed,
            (Running, TaskStatus::Approved) => Running,
            (_, TaskStatus::Pending) => Running,
        }
    }

    /// Reduces a node's task statuses, starting from `Pending`.
    pub fn reduce<I>(statuses: I) -> NodeStatus
    where
        I: IntoIterator<Item = TaskStatus>,
    {
        statuses
            .into_iter()
            .fold(NodeStatus::Pending, NodeStatus::transition)
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, NodeStatus::Completed | NodeStatus::Running)
    }
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Pending => write!(f, "pending"),
            NodeStatus::Running => write!(f, "running"),
            NodeStatus::Completed => write!(f, "completed"),
            NodeStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Status of `node_id` derived from every task spawned for it.
pub fn node_status(node_id: &str, tasks: &[Task]) -> NodeStatus {
    NodeStatus::reduce(
        tasks
            .iter()
            .filter(|task| task.node_id.as_deref() == Some(node_id))
            .map(|task| task.status),
    )
}
