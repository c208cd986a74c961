use super::WorkflowGraph;
use super::validator::{Diagnostic, Severity};
use crate::condition::{ConditionOperator, FieldKind, FormSchema};
use crate::workflow::{ApproverType, NO_BRANCH, NodeKind, NodeType, YES_BRANCH};
use itertools::Itertools;

/// What a rule gets to look at.
pub struct RuleContext<'a, 'g> {
    pub graph: &'a WorkflowGraph<'g>,
    pub schema: Option<&'a FormSchema>,
}

/// A single structural or configuration check on a workflow design.
pub trait GraphRule: Send + Sync {
    fn code(&self) -> &'static str;
    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic>;
}

pub fn built_in_rules(require_connectivity: bool) -> Vec<Box<dyn GraphRule>> {
    let connectivity = if require_connectivity {
        Severity::Error
    } else {
        Severity::Warning
    };
    vec![
        Box::new(EdgeEndpointsRule),
        Box::new(FanOutRule),
        Box::new(TerminalNodesRule),
        Box::new(StartEndPresenceRule),
        Box::new(DuplicateIdsRule),
        Box::new(ApprovalConfigRule),
        Box::new(ConditionConfigRule),
        Box::new(BranchLabelRule),
        Box::new(ConnectivityRule {
            severity: connectivity,
        }),
    ]
}

struct EdgeEndpointsRule;

impl GraphRule for EdgeEndpointsRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-001"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for edge in ctx.graph.edges() {
            for (role, id) in [("source", &edge.source), ("target", &edge.target)] {
                if !ctx.graph.contains(id) {
                    out.push(Diagnostic::error(
                        self.code(),
                        format!(
                            "Edge '{}' references unknown {} node '{}'",
                            edge.id, role, id
                        ),
                        None,
                    ));
                }
            }
        }
        out
    }
}

struct FanOutRule;

impl GraphRule for FanOutRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-002"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        ctx.graph
            .nodes()
            .iter()
            // End nodes are covered by the terminal rule.
            .filter(|node| node.node_type() != NodeType::End)
            .filter_map(|node| {
                let count = ctx.graph.outgoing(&node.id).len();
                let limit = node.max_outgoing();
                (count > limit).then(|| {
                    Diagnostic::error(
                        self.code(),
                        format!(
                            "{} node '{}' has {} outgoing edges, at most {} allowed",
                            capitalize(node.node_type()),
                            node.id,
                            count,
                            limit
                        ),
                        Some(node.id.clone()),
                    )
                })
            })
            .collect()
    }
}

struct TerminalNodesRule;

impl GraphRule for TerminalNodesRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-003"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for edge in ctx.graph.edges() {
            if let Some(source) = ctx.graph.node(&edge.source) {
                if source.node_type() == NodeType::End {
                    out.push(Diagnostic::error(
                        self.code(),
                        format!(
                            "End node '{}' cannot be the source of edge '{}'",
                            source.id, edge.id
                        ),
                        Some(source.id.clone()),
                    ));
                }
            }
            if let Some(target) = ctx.graph.node(&edge.target) {
                if target.node_type() == NodeType::Start {
                    out.push(Diagnostic::error(
                        self.code(),
                        format!(
                            "Start node '{}' cannot be the target of edge '{}'",
                            target.id, edge.id
                        ),
                        Some(target.id.clone()),
                    ));
                }
            }
        }
        out
    }
}

struct StartEndPresenceRule;

impl GraphRule for StartEndPresenceRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-004"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let counts = ctx.graph.nodes().iter().counts_by(|node| node.node_type());
        let starts = counts.get(&NodeType::Start).copied().unwrap_or(0);
        let ends = counts.get(&NodeType::End).copied().unwrap_or(0);

        let mut out = Vec::new();
        if starts != 1 {
            out.push(Diagnostic::error(
                self.code(),
                format!("Workflow must have exactly one start node, found {}", starts),
                None,
            ));
        }
        if ends == 0 {
            out.push(Diagnostic::error(
                self.code(),
                "Workflow must have at least one end node",
                None,
            ));
        }
        out
    }
}

struct DuplicateIdsRule;

impl GraphRule for DuplicateIdsRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-005"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let nodes = ctx
            .graph
            .nodes()
            .iter()
            .map(|node| node.id.as_str())
            .duplicates()
            .map(|id| {
                Diagnostic::error(
                    self.code(),
                    format!("Duplicate node id '{}'", id),
                    Some(id.to_string()),
                )
            });
        let edges = ctx
            .graph
            .edges()
            .iter()
            .map(|edge| edge.id.as_str())
            .duplicates()
            .map(|id| Diagnostic::error(self.code(), format!("Duplicate edge id '{}'", id), None));
        nodes.chain(edges).collect()
    }
}

struct ApprovalConfigRule;

impl GraphRule for ApprovalConfigRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-006"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        ctx.graph
            .nodes()
            .iter()
            .filter_map(|node| match &node.kind {
                NodeKind::Approval(config)
                    if config.approver_type == ApproverType::SpecificMembers
                        && config.approvers.is_empty() =>
                {
                    Some(Diagnostic::error(
                        self.code(),
                        format!(
                            "Approval node '{}' uses specific members but lists no approvers",
                            node.id
                        ),
                        Some(node.id.clone()),
                    ))
                }
                _ => None,
            })
            .collect()
    }
}

struct ConditionConfigRule;

impl GraphRule for ConditionConfigRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-007"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for node in ctx.graph.nodes() {
            let NodeKind::Condition(config) = &node.kind else {
                continue;
            };
            if config.field.trim().is_empty() {
                out.push(Diagnostic::error(
                    self.code(),
                    format!("Condition node '{}' has no field selected", node.id),
                    Some(node.id.clone()),
                ));
                continue;
            }
            if config.operator.positive() == ConditionOperator::Contains
                && config.value.trim().is_empty()
            {
                out.push(Diagnostic::error(
                    self.code(),
                    format!(
                        "Condition node '{}' uses operator '{}' with an empty comparison value",
                        node.id, config.operator
                    ),
                    Some(node.id.clone()),
                ));
            }
            let Some(schema) = ctx.schema else {
                continue;
            };
            let Some(field) = schema.field(&config.field) else {
                out.push(Diagnostic::error(
                    self.code(),
                    format!(
                        "Condition node '{}' references field '{}' which is not part of form '{}'",
                        node.id, config.field, schema.form_type
                    ),
                    Some(node.id.clone()),
                ));
                continue;
            };
            if !field.field_type.supports(config.operator) {
                out.push(Diagnostic::error(
                    self.code(),
                    format!(
                        "Condition node '{}' uses operator '{}' which is not supported for {} field '{}'",
                        node.id,
                        config.operator,
                        field.field_type.kind(),
                        config.field
                    ),
                    Some(node.id.clone()),
                ));
            } else if field.field_type.kind() == FieldKind::Number
                && config.value.trim().parse::<f64>().is_err()
            {
                out.push(Diagnostic::error(
                    self.code(),
                    format!(
                        "Condition node '{}' compares number field '{}' with non-numeric value '{}'",
                        node.id, config.field, config.value
                    ),
                    Some(node.id.clone()),
                ));
            }
        }
        out
    }
}

struct BranchLabelRule;

impl GraphRule for BranchLabelRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-008"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for node in ctx.graph.nodes() {
            if node.node_type() != NodeType::Condition {
                continue;
            }
            let outgoing = ctx.graph.outgoing(&node.id);
            let labels: Vec<&str> = outgoing
                .iter()
                .filter_map(|edge| edge.label.as_deref())
                .collect();
            for edge in outgoing.iter().filter(|edge| edge.label.is_none()) {
                out.push(Diagnostic::warning(
                    self.code(),
                    format!(
                        "Condition node '{}' has an unlabelled branch '{}'",
                        node.id, edge.id
                    ),
                    Some(node.id.clone()),
                ));
            }
            if labels.iter().duplicates().next().is_some() {
                out.push(Diagnostic::error(
                    self.code(),
                    format!(
                        "Condition node '{}' has two branches with the same label",
                        node.id
                    ),
                    Some(node.id.clone()),
                ));
            }
            for label in labels {
                if label != YES_BRANCH && label != NO_BRANCH {
                    out.push(Diagnostic::warning(
                        self.code(),
                        format!(
                            "Condition node '{}' has a branch labelled '{}', expected '{}' or '{}'",
                            node.id, label, YES_BRANCH, NO_BRANCH
                        ),
                        Some(node.id.clone()),
                    ));
                }
            }
        }
        out
    }
}

struct ConnectivityRule {
    severity: Severity,
}

impl GraphRule for ConnectivityRule {
    fn code(&self) -> &'static str {
        "KS-GRAPH-009"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        let Some(start) = ctx.graph.start_node() else {
            return Vec::new();
        };
        let reachable = ctx.graph.reachable_from(&start.id);

        let mut out = Vec::new();
        if !ctx.graph.end_nodes().any(|end| reachable.contains(end.id.as_str())) {
            out.push(Diagnostic::new(
                self.code(),
                self.severity,
                format!("No end node is reachable from start node '{}'", start.id),
                Some(start.id.clone()),
            ));
        }
        for node in ctx.graph.nodes() {
            if !reachable.contains(node.id.as_str()) {
                out.push(Diagnostic::new(
                    self.code(),
                    self.severity,
                    format!("Node '{}' is not reachable from the start node", node.id),
                    Some(node.id.clone()),
                ));
            } else if node.node_type() != NodeType::End && ctx.graph.outgoing(&node.id).is_empty()
            {
                out.push(Diagnostic::new(
                    self.code(),
                    self.severity,
                    format!("Node '{}' has no outgoing edge", node.id),
                    Some(node.id.clone()),
                ));
            }
        }
        out
    }
}

fn capitalize(node_type: NodeType) -> String {
    let name = node_type.to_string();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
