use super::definition::Workflow;
use crate::error::ConversionError;

/// A trait for editor or API formats that can be converted into a typed `Workflow`.
///
/// The bundled [`EditorDocument`](super::EditorDocument) implements it for the
/// JSON produced by the workflow designer. Other front ends provide their own
/// translation layer by implementing this trait.
///
/// # Example
///
/// ```rust,no_run
/// use kessai::prelude::*;
/// use kessai::error::ConversionError;
///
/// struct LegacyStep { id: String, approver: String }
/// struct LegacyChain { id: String, steps: Vec<LegacyStep> }
///
/// impl IntoWorkflow for LegacyChain {
///     fn into_workflow(self) -> std::result::Result<Workflow, ConversionError> {
///         let mut nodes = vec![WorkflowNode::new("start", "Start", NodeKind::Start)];
///         for step in &self.steps {
///             let config = ApprovalConfig {
///                 approvers: vec![step.approver.clone()],
///                 ..ApprovalConfig::default()
///             };
///             nodes.push(WorkflowNode::new(step.id.clone(), "Approve", NodeKind::Approval(config)));
///         }
///         nodes.push(WorkflowNode::new("end", "End", NodeKind::End));
///         let edges = nodes
///             .windows(2)
///             .map(|pair| WorkflowEdge::new(pair[0].id.clone(), pair[1].id.clone()))
///             .collect();
///         Ok(Workflow {
///             id: self.id,
///             name: "Legacy chain".to_string(),
///             description: String::new(),
///             form_type: "expense_reimbursements".to_string(),
///             status: WorkflowStatus::Draft,
///             nodes,
///             edges,
///         })
///     }
/// }
/// ```
pub trait IntoWorkflow {
    /// Consumes the object and converts it into a typed workflow.
    fn into_workflow(self) -> Result<Workflow, ConversionError>;
}
