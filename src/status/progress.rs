use super::{NodeStatus, Task};
use crate::graph::WorkflowGraph;
use crate::workflow::{NodeKind, NodeType};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// A running (or finished) execution of a workflow for one entity record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowInstance {
    pub id: String,
    pub workflow_id: String,
    /// The node the engine will activate next, if any.
    #[serde(default)]
    pub current_node_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Pending,
    Running,
    Completed,
    Rejected,
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceStatus::Pending => write!(f, "pending"),
            InstanceStatus::Running => write!(f, "running"),
            InstanceStatus::Completed => write!(f, "completed"),
            InstanceStatus::Rejected => write!(f, "rejected"),
        }
    }
}

/// Status of one node within an instance, with the tasks that produced it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeProgress {
    pub node_id: String,
    pub title: String,
    pub node_type: NodeType,
    pub status: NodeStatus,
    pub is_current: bool,
    /// Whether the progress view shows this node.
    pub visible: bool,
    pub tasks: Vec<Task>,
}

impl NodeProgress {
    pub fn has_pending_task(&self) -> bool {
        self.tasks.iter().any(Task::is_pending)
    }
}

/// Per-node and overall progress of a workflow instance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceProgress {
    pub instance_id: String,
    pub status: InstanceStatus,
    /// Every node of the workflow in display order.
    pub nodes: Vec<NodeProgress>,
    /// The first rejected node in display order; nothing after it is shown.
    pub halted_at: Option<String>,
    /// Tasks without a node id, or whose node no longer exists.
    pub unknown: Vec<Task>,
}

impl InstanceProgress {
    pub fn build(graph: &WorkflowGraph<'_>, instance: &WorkflowInstance, tasks: &[Task]) -> Self {
        let (known, unknown): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|task| {
            task.node_id
                .as_deref()
                .is_some_and(|node_id| graph.contains(node_id))
        });
        if !unknown.is_empty() {
            warn!(
                instance = %instance.id,
                count = unknown.len(),
                task_ids = %unknown.iter().map(|t| t.id.as_str()).join(","),
                "tasks reference unknown workflow nodes"
            );
        }
        let mut by_node = known
            .into_iter()
            .into_group_map_by(|task| task.node_id.clone().unwrap_or_default());

        let current = instance.current_node_id.as_deref();
        let mut nodes: Vec<NodeProgress> = graph
            .display_order()
            .into_iter()
            .map(|node| {
                let tasks: Vec<Task> = by_node
                    .remove(&node.id)
                    .unwrap_or_default()
                    .into_iter()
                    .cloned()
                    .collect();
                NodeProgress {
                    node_id: node.id.clone(),
                    title: node.title.clone(),
                    node_type: node.node_type(),
                    status: NodeStatus::reduce(tasks.iter().map(|t| t.status)),
                    is_current: current == Some(node.id.as_str()),
                    visible: false,
                    tasks,
                }
            })
            .collect();

        let halt_index = nodes
            .iter()
            .position(|node| node.status == NodeStatus::Rejected);
        for (index, node) in nodes.iter_mut().enumerate() {
            node.visible = match halt_index {
                Some(halt) if index > halt => false,
                Some(halt) if index == halt => true,
                _ => node.status.is_visible() || node.is_current || node.has_pending_task(),
            };
        }

        let current_is_open = current
            .and_then(|id| graph.node(id))
            .is_some_and(|node| !matches!(node.kind, NodeKind::End));
        let status = if halt_index.is_some() {
            InstanceStatus::Rejected
        } else if nodes.iter().any(|n| n.status == NodeStatus::Running) || current_is_open {
            InstanceStatus::Running
        } else if nodes.iter().any(|n| n.status == NodeStatus::Completed) {
            InstanceStatus::Completed
        } else {
            InstanceStatus::Pending
        };

        Self {
            instance_id: instance.id.clone(),
            status,
            halted_at: halt_index.map(|i| nodes[i].node_id.clone()),
            nodes,
            unknown: unknown.into_iter().cloned().collect(),
        }
    }

    pub fn visible_nodes(&self) -> impl Iterator<Item = &NodeProgress> {
        self.nodes.iter().filter(|node| node.visible)
    }

    pub fn node(&self, node_id: &str) -> Option<&NodeProgress> {
        self.nodes.iter().find(|node| node.node_id == node_id)
    }
}
