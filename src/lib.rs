//! # Kessai - Approval Workflow Graph Model & Status Engine
//!
//! **Kessai** holds the rules behind the approval flows of a finance back office:
//! which hand-drawn graphs of approval and condition nodes are legal workflows,
//! which branch a condition node takes for a given record, where a running
//! instance stands given its task history, and how an amount is split across
//! teams. Everything here is a synchronous, side-effect-free computation over
//! explicit inputs; persistence and execution belong to the back-office API.
//!
//! ## Core Workflow
//!
//! 1.  **Load a design**: Parse the designer's JSON with `Workflow::from_json`, or
//!     implement `IntoWorkflow` for your own format.
//! 2.  **Edit**: Use a `GraphEditor` to draw connections. Illegal connections are
//!     refused before an edge exists.
//! 3.  **Validate**: Run a `Validator` over the nodes and edges. The report lists
//!     every problem at once.
//! 4.  **Route and track**: Resolve condition branches with `resolve_branch` and
//!     derive node and instance status from task records with `InstanceProgress`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kessai::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut editor = GraphEditor::new(
//!         vec![
//!             WorkflowNode::new("start", "Start", NodeKind::Start),
//!             WorkflowNode::new(
//!                 "manager",
//!                 "Manager approval",
//!                 NodeKind::Approval(ApprovalConfig {
//!                     approvers: vec!["u-42".to_string()],
//!                     ..ApprovalConfig::default()
//!                 }),
//!             ),
//!             WorkflowNode::new("end", "End", NodeKind::End),
//!         ],
//!         vec![],
//!     );
//!     editor.connect("start", "manager");
//!     editor.connect("manager", "end");
//!     // Refused: the end node never has outgoing edges.
//!     assert!(editor.connect("end", "manager").is_none());
//!
//!     let report = Validator::default().validate(editor.nodes(), editor.edges());
//!     println!("{}", ReportFormatter::format_validation(&report));
//!
//!     let tasks = vec![Task::new("t1", "manager", "u-42", TaskStatus::Pending)];
//!     let status = node_status("manager", &tasks);
//!     println!("manager: {}", status);
//!     Ok(())
//! }
//! ```

pub mod allocation;
pub mod condition;
pub mod data;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod report;
pub mod service;
pub mod status;
pub mod workflow;
