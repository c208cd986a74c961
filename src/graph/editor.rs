use super::WorkflowGraph;
use crate::error::EditError;
use crate::workflow::{NO_BRANCH, NodeKind, Workflow, WorkflowEdge, WorkflowNode, YES_BRANCH};
use tracing::debug;

/// An editing session over a workflow design.
///
/// Connections go through [`GraphEditor::is_valid_connection`] before an edge is
/// created, so fan-out limits and terminal-node rules hold while drawing.
#[derive(Debug, Clone, Default)]
pub struct GraphEditor {
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
}

impl GraphEditor {
    pub fn new(nodes: Vec<WorkflowNode>, edges: Vec<WorkflowEdge>) -> Self {
        Self { nodes, edges }
    }

    pub fn from_workflow(workflow: &Workflow) -> Self {
        Self::new(workflow.nodes.clone(), workflow.edges.clone())
    }

    pub fn nodes(&self) -> &[WorkflowNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[WorkflowEdge] {
        &self.edges
    }

    pub fn graph(&self) -> WorkflowGraph<'_> {
        WorkflowGraph::new(&self.nodes, &self.edges)
    }

    /// Whether an edge from `source` to `target` may be drawn.
    pub fn is_valid_connection(&self, source: &str, target: &str) -> bool {
        let graph = self.graph();
        let (Some(from), Some(to)) = (graph.node(source), graph.node(target)) else {
            return false;
        };
        if source == target
            || matches!(from.kind, NodeKind::End)
            || matches!(to.kind, NodeKind::Start)
        {
            return false;
        }
        let outgoing = graph.outgoing(source);
        if outgoing.iter().any(|edge| edge.target == target) {
            return false;
        }
        outgoing.len() < from.max_outgoing()
    }

    /// Draws an edge if the connection is allowed and returns its id.
    ///
    /// A rejected connection leaves the edge set untouched and returns `None`.
    /// Edges out of a condition node are labelled `是` then `否`.
    pub fn connect(&mut self, source: &str, target: &str) -> Option<String> {
        if !self.is_valid_connection(source, target) {
            debug!(source, target, "rejected connection");
            return None;
        }

        let mut edge = WorkflowEdge::new(source, target);
        if self
            .node(source)
            .is_some_and(|node| matches!(node.kind, NodeKind::Condition(_)))
        {
            edge.label = Some(self.next_branch_label(source).to_string());
        }
        while self.edges.iter().any(|e| e.id == edge.id) {
            edge.id.push('\'');
        }

        let id = edge.id.clone();
        self.edges.push(edge);
        Some(id)
    }

    fn next_branch_label(&self, source: &str) -> &'static str {
        let yes_taken = self
            .edges
            .iter()
            .any(|e| e.source == source && e.label.as_deref() == Some(YES_BRANCH));
        if yes_taken { NO_BRANCH } else { YES_BRANCH }
    }

    pub fn disconnect(&mut self, edge_id: &str) -> Result<WorkflowEdge, EditError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.id == edge_id)
            .ok_or_else(|| EditError::EdgeNotFound(edge_id.to_string()))?;
        Ok(self.edges.remove(index))
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn add_node(&mut self, node: WorkflowNode) -> Result<(), EditError> {
        if self.node(&node.id).is_some() {
            return Err(EditError::DuplicateNode(node.id));
        }
        self.nodes.push(node);
        Ok(())
    }

    /// Removes a node and every edge attached to it.
    pub fn remove_node(&mut self, id: &str) -> Result<WorkflowNode, EditError> {
        let index = self.mutable_node_index(id)?;
        let node = self.nodes.remove(index);
        self.edges.retain(|e| e.source != id && e.target != id);
        Ok(node)
    }

    /// Replaces a node's title and configuration. The node type may change.
    ///
    /// A change that would leave the node with more outgoing edges than its new
    /// type allows is refused. Branch labels are dropped when a condition node
    /// becomes an approval node.
    pub fn update_node(
        &mut self,
        id: &str,
        title: impl Into<String>,
        kind: NodeKind,
    ) -> Result<(), EditError> {
        if matches!(kind, NodeKind::Start | NodeKind::End) {
            return Err(EditError::ImmutableNode(id.to_string()));
        }
        let index = self.mutable_node_index(id)?;

        let outgoing = self.edges.iter().filter(|e| e.source == id).count();
        let limit = WorkflowNode::new(id, "", kind.clone()).max_outgoing();
        if outgoing > limit {
            return Err(EditError::FanOutExceeded {
                node_id: id.to_string(),
                outgoing,
                limit,
            });
        }

        let is_condition = matches!(kind, NodeKind::Condition(_));
        let node = &mut self.nodes[index];
        node.title = title.into();
        node.kind = kind;
        if !is_condition {
            for edge in self.edges.iter_mut().filter(|e| e.source == id) {
                edge.label = None;
            }
        }
        Ok(())
    }

    fn mutable_node_index(&self, id: &str) -> Result<usize, EditError> {
        let index = self
            .nodes
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| EditError::NodeNotFound(id.to_string()))?;
        if self.nodes[index].is_immutable() {
            return Err(EditError::ImmutableNode(id.to_string()));
        }
        Ok(index)
    }

    /// Hands the design over for saving.
    pub fn into_design(self) -> (Vec<WorkflowNode>, Vec<WorkflowEdge>) {
        (self.nodes, self.edges)
    }
}
