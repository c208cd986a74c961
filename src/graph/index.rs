use crate::workflow::{NodeKind, Workflow, WorkflowEdge, WorkflowNode};
use ahash::{AHashMap, AHashSet};
use std::collections::VecDeque;

/// Read-only adjacency index over a workflow's node and edge sets.
///
/// Edges keep their creation order in the outgoing and incoming lists. Edges that
/// reference unknown nodes are still indexed under the ids they name.
pub struct WorkflowGraph<'a> {
    nodes: &'a [WorkflowNode],
    edges: &'a [WorkflowEdge],
    by_id: AHashMap<&'a str, &'a WorkflowNode>,
    outgoing: AHashMap<&'a str, Vec<&'a WorkflowEdge>>,
    incoming: AHashMap<&'a str, Vec<&'a WorkflowEdge>>,
}

impl<'a> WorkflowGraph<'a> {
    pub fn new(nodes: &'a [WorkflowNode], edges: &'a [WorkflowEdge]) -> Self {
        let mut by_id = AHashMap::with_capacity(nodes.len());
        for node in nodes {
            // First definition wins; duplicates are reported by the validator.
            by_id.entry(node.id.as_str()).or_insert(node);
        }

        let mut outgoing: AHashMap<&str, Vec<&WorkflowEdge>> = AHashMap::new();
        let mut incoming: AHashMap<&str, Vec<&WorkflowEdge>> = AHashMap::new();
        for edge in edges {
            outgoing.entry(edge.source.as_str()).or_default().push(edge);
            incoming.entry(edge.target.as_str()).or_default().push(edge);
        }

        Self {
            nodes,
            edges,
            by_id,
            outgoing,
            incoming,
        }
    }

    pub fn from_workflow(workflow: &'a Workflow) -> Self {
        Self::new(&workflow.nodes, &workflow.edges)
    }

    pub fn nodes(&self) -> &'a [WorkflowNode] {
        self.nodes
    }

    pub fn edges(&self) -> &'a [WorkflowEdge] {
        self.edges
    }

    pub fn node(&self, id: &str) -> Option<&'a WorkflowNode> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn outgoing(&self, id: &str) -> &[&'a WorkflowEdge] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn incoming(&self, id: &str) -> &[&'a WorkflowEdge] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn start_node(&self) -> Option<&'a WorkflowNode> {
        self.nodes.iter().find(|n| matches!(n.kind, NodeKind::Start))
    }

    pub fn end_nodes(&self) -> impl Iterator<Item = &'a WorkflowNode> + 'a {
        self.nodes.iter().filter(|n| matches!(n.kind, NodeKind::End))
    }

    /// Ids of every node reachable from `from`, including `from` itself.
    pub fn reachable_from(&self, from: &str) -> AHashSet<&'a str> {
        let mut seen = AHashSet::new();
        let Some(root) = self.node(from) else {
            return seen;
        };
        let mut queue = VecDeque::from([root.id.as_str()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            for edge in self.outgoing(current) {
                if let Some(next) = self.node(&edge.target) {
                    queue.push_back(next.id.as_str());
                }
            }
        }
        seen
    }

    /// Nodes in display order: breadth first from the start node following edges
    /// in creation order, then anything unreachable in definition order.
    pub fn display_order(&self) -> Vec<&'a WorkflowNode> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut seen: AHashSet<&str> = AHashSet::new();

        if let Some(start) = self.start_node() {
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                if !seen.insert(node.id.as_str()) {
                    continue;
                }
                order.push(node);
                for edge in self.outgoing(&node.id) {
                    if let Some(next) = self.node(&edge.target) {
                        queue.push_back(next);
                    }
                }
            }
        }

        for node in self.nodes {
            if seen.insert(node.id.as_str()) {
                order.push(node);
            }
        }
        order
    }
}
