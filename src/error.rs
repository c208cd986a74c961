use crate::condition::{ConditionOperator, FieldKind};
use thiserror::Error;

/// Errors that can occur when converting an editor document into a typed `Workflow`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionError {
    #[error("Failed to parse workflow JSON: {0}")]
    JsonParseError(String),

    #[error("Node '{node_id}' has an unknown node type: '{type_name}'")]
    UnknownNodeType { node_id: String, type_name: String },

    #[error("Node '{node_id}' is missing required configuration field '{field}'")]
    MissingConfig { node_id: String, field: String },

    #[error("Node '{node_id}' has an invalid value for '{field}': '{value}'")]
    InvalidConfig {
        node_id: String,
        field: String,
        value: String,
    },
}

/// Configuration defects found while evaluating a condition node.
///
/// These mean the workflow definition itself is broken, as opposed to a user
/// input that fails validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConditionError {
    #[error("Operator '{operator}' is not supported for field '{field}' of type {kind}")]
    UnsupportedOperator {
        field: String,
        kind: FieldKind,
        operator: ConditionOperator,
    },

    #[error("Comparison value '{value}' for number field '{field}' is not a number")]
    InvalidComparisonValue { field: String, value: String },
}

/// Errors that can occur while choosing the outgoing branch of a condition node.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Node '{0}' not found in the workflow")]
    NodeNotFound(String),

    #[error("Node '{0}' is not a condition node")]
    NotAConditionNode(String),

    #[error("Condition node '{node_id}' has no '{label}' branch")]
    MissingBranch { node_id: String, label: String },

    #[error(transparent)]
    Condition(#[from] ConditionError),
}

/// Errors raised by editor operations on a workflow graph.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditError {
    #[error("Node '{0}' is a start or end node and cannot be removed or reconfigured")]
    ImmutableNode(String),

    #[error("Node '{0}' not found in the workflow")]
    NodeNotFound(String),

    #[error("Node '{0}' already exists in the workflow")]
    DuplicateNode(String),

    #[error("Edge '{0}' not found in the workflow")]
    EdgeNotFound(String),

    #[error("Node '{node_id}' has {outgoing} outgoing edges but its new type allows at most {limit}")]
    FanOutExceeded {
        node_id: String,
        outgoing: usize,
        limit: usize,
    },
}

/// Recoverable allocation problems that block a submission.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AllocationError {
    #[error("Selected allocation ratios sum to {total:.4}, expected 1 (tolerance {tolerance})")]
    Imbalance { total: f64, tolerance: f64 },

    #[error("Team '{team_id}' has an invalid allocation ratio: {ratio}")]
    InvalidRatio { team_id: String, ratio: f64 },
}

/// Errors raised when an approver tries to decide a task.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    #[error("Comments are required to approve or reject a task")]
    MissingComments,

    #[error("Task '{0}' is no longer pending")]
    TaskNotPending(String),

    #[error("Task '{task_id}' is not assigned to user '{user_id}'")]
    NotAssignee { task_id: String, user_id: String },
}

/// Errors reported by the external workflow, task and allocation services.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ServiceError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    #[error("Workflow design rejected: {}", errors.join("; "))]
    DesignRejected { errors: Vec<String> },

    #[error(transparent)]
    Decision(#[from] DecisionError),

    #[error("Service error: {0}")]
    Generic(String),
}

/// Errors that can occur while saving or loading a workflow snapshot.
#[derive(Error, Debug, Clone)]
pub enum ArtifactError {
    #[error("Snapshot error: {0}")]
    Generic(String),
}
