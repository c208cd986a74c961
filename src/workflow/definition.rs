use crate::condition::ConditionOperator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The label given to the branch taken when a condition holds.
pub const YES_BRANCH: &str = "是";
/// The label given to the branch taken when a condition does not hold.
pub const NO_BRANCH: &str = "否";

/// A complete approval workflow: metadata plus its node and edge sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Selects which entity schema applies, e.g. `payment_requests`.
    pub form_type: String,
    pub status: WorkflowStatus,
    pub nodes: Vec<WorkflowNode>,
    pub edges: Vec<WorkflowEdge>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    #[default]
    Draft,
    Active,
    Inactive,
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkflowStatus::Draft => write!(f, "draft"),
            WorkflowStatus::Active => write!(f, "active"),
            WorkflowStatus::Inactive => write!(f, "inactive"),
        }
    }
}

/// Layout position. Carries no meaning for validation or routing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A single node in the workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,
    pub title: String,
    pub position: Position,
    pub kind: NodeKind,
}

impl WorkflowNode {
    pub fn new(id: impl Into<String>, title: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            position: Position::default(),
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Start and end nodes cannot be deleted or reconfigured.
    pub fn is_immutable(&self) -> bool {
        matches!(self.kind, NodeKind::Start | NodeKind::End)
    }

    /// Maximum number of outgoing edges this node may have.
    pub fn max_outgoing(&self) -> usize {
        match self.kind {
            NodeKind::Condition(_) => 2,
            NodeKind::End => 0,
            NodeKind::Start | NodeKind::Approval(_) => 1,
        }
    }
}

/// Type-specific node configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Start,
    Approval(ApprovalConfig),
    Condition(ConditionConfig),
    End,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Start => NodeType::Start,
            NodeKind::Approval(_) => NodeType::Approval,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::End => NodeType::End,
        }
    }
}

/// The node type without its configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Start,
    Approval,
    Condition,
    End,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeType::Start => write!(f, "start"),
            NodeType::Approval => write!(f, "approval"),
            NodeType::Condition => write!(f, "condition"),
            NodeType::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApprovalConfig {
    pub approver_type: ApproverType,
    pub approval_type: ApprovalType,
    /// Approver user ids, used when `approver_type` is `SpecificMembers`.
    pub approvers: Vec<String>,
    pub allow_allocation_edit: bool,
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            approver_type: ApproverType::SpecificMembers,
            approval_type: ApprovalType::Single,
            approvers: Vec::new(),
            allow_allocation_edit: false,
        }
    }
}

impl ApprovalConfig {
    /// Number of approvals needed before the node counts as passed, given how many
    /// approvers were assigned when it activated.
    pub fn required_approvals(&self, assigned: usize) -> usize {
        match self.approval_type {
            ApprovalType::Single => assigned.min(1),
            ApprovalType::All => assigned,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproverType {
    SpecificMembers,
    DepartmentManager,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalType {
    /// Any one approver decides for the node.
    Single,
    /// Every assigned approver must approve.
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Key into the entity data.
    pub field: String,
    pub operator: ConditionOperator,
    /// Compared after coercion to the field's declared type.
    pub value: String,
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Only used to mark the yes/no branches out of a condition node.
    pub label: Option<String>,
}

impl WorkflowEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        let source = source.into();
        let target = target.into();
        Self {
            id: format!("edge-{}-{}", source, target),
            source,
            target,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}
