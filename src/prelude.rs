//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and functions from the kessai crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use kessai::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let json = std::fs::read_to_string("path/to/workflow.json")?;
//! let workflow = Workflow::from_json(&json)?;
//!
//! let report = Validator::default().validate_workflow(&workflow);
//! println!("{}", ReportFormatter::format_validation(&report));
//! # Ok(())
//! # }
//! ```

// Workflow model
pub use crate::workflow::{
    ApprovalConfig, ApprovalType, ApproverType, ConditionConfig, EditorDocument, IntoWorkflow,
    NO_BRANCH, NodeKind, NodeType, Position, Workflow, WorkflowEdge, WorkflowNode,
    WorkflowSnapshot, WorkflowStatus, YES_BRANCH,
};

// Graph editing and validation
pub use crate::graph::{GraphEditor, ValidationReport, Validator, WorkflowGraph, validate};

// Conditions
pub use crate::condition::{
    ConditionEvaluator, ConditionOperator, FieldType, FieldValue, FormField, FormSchema,
    evaluate, resolve_branch,
};
pub use crate::data::EntityData;

// Task status
pub use crate::status::{
    ApprovalDecision, Inbox, InstanceProgress, InstanceStatus, NodeStatus, Task, TaskStatus,
    Verdict, WorkflowInstance, node_status,
};

// Allocation
pub use crate::allocation::{
    AllocationShare, MileageRateConfig, Percent, RateTier, TeamAllocationConfig, performance,
    recompute, validate_balance,
};

// Formatting
pub use crate::report::ReportFormatter;

// Error types
pub use crate::error::{
    AllocationError, ConditionError, ConversionError, DecisionError, EditError, RoutingError,
    ServiceError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
