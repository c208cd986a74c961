use super::ConditionEvaluator;
use crate::data::EntityData;
use crate::error::RoutingError;
use crate::graph::WorkflowGraph;
use crate::workflow::{NO_BRANCH, NodeKind, WorkflowEdge, YES_BRANCH};
use tracing::debug;

/// Chooses the outgoing edge of a condition node for the given record.
///
/// The `是` edge fires when the condition holds and the `否` edge otherwise.
/// When only one branch is labelled, the first unlabelled edge is the other one.
/// With no branch labels at all, creation order decides: the first edge is yes.
pub fn resolve_branch<'g>(
    graph: &WorkflowGraph<'g>,
    node_id: &str,
    evaluator: &ConditionEvaluator<'_>,
    data: &EntityData,
) -> Result<&'g WorkflowEdge, RoutingError> {
    let node = graph
        .node(node_id)
        .ok_or_else(|| RoutingError::NodeNotFound(node_id.to_string()))?;
    let NodeKind::Condition(config) = &node.kind else {
        return Err(RoutingError::NotAConditionNode(node_id.to_string()));
    };

    let outcome = evaluator.evaluate_node(config, data)?;
    let (label, position) = if outcome {
        (YES_BRANCH, 0)
    } else {
        (NO_BRANCH, 1)
    };

    let outgoing = graph.outgoing(node_id);
    let edge = outgoing
        .iter()
        .find(|edge| edge.label.as_deref() == Some(label))
        .or_else(|| {
            let unlabelled: Vec<_> = outgoing.iter().filter(|e| e.label.is_none()).collect();
            let partly_labelled = outgoing.iter().any(|e| {
                matches!(e.label.as_deref(), Some(YES_BRANCH) | Some(NO_BRANCH))
            });
            if partly_labelled {
                unlabelled.first().copied()
            } else {
                unlabelled.get(position).copied()
            }
        })
        .copied()
        .ok_or_else(|| RoutingError::MissingBranch {
            node_id: node_id.to_string(),
            label: label.to_string(),
        })?;

    debug!(node = node_id, branch = label, target = %edge.target, "resolved condition branch");
    Ok(edge)
}
