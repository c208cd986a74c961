//! Tests for the workflow graph index, validator rules and editor session.
mod common;
use common::*;
use kessai::graph::{Diagnostic, GraphRule, RuleContext, Severity};
use kessai::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn has_code(report: &ValidationReport, code: &str) -> bool {
    report.diagnostics.iter().any(|d| d.code == code)
}

fn strict_validator() -> Validator {
    Validator::builder()
        .with_schema(reimbursement_schema())
        .require_connectivity(true)
        .build()
}

#[test]
fn test_display_order_follows_edges_from_start() {
    let workflow = reimbursement_workflow();
    let graph = WorkflowGraph::from_workflow(&workflow);
    let order: Vec<&str> = graph
        .display_order()
        .iter()
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(
        order,
        vec!["start", "manager", "amount_check", "director", "end"]
    );
    assert_eq!(graph.outgoing("amount_check").len(), 2);
    assert_eq!(graph.incoming("end").len(), 2);
    assert!(graph.outgoing("missing").is_empty());
}

#[test]
fn test_unreachable_nodes_come_last_in_display_order() {
    let nodes = unconnected_nodes();
    let edges = vec![WorkflowEdge::new("start", "a2"), WorkflowEdge::new("a2", "end")];
    let graph = WorkflowGraph::new(&nodes, &edges);
    let order: Vec<&str> = graph
        .display_order()
        .iter()
        .map(|node| node.id.as_str())
        .collect();
    assert_eq!(order, vec!["start", "a2", "end", "a1", "c1"]);
}

#[test]
fn test_valid_workflow_passes_strict_validation() {
    let report = strict_validator().validate_workflow(&reimbursement_workflow());
    assert!(report.is_valid, "unexpected errors: {:?}", report.errors);
    assert!(report.warnings.is_empty(), "{:?}", report.warnings);
}

#[test]
fn test_end_node_as_edge_source_is_rejected() {
    let mut workflow = reimbursement_workflow();
    workflow.edges.push(WorkflowEdge::new("end", "manager"));

    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(has_code(&report, "KS-GRAPH-003"));
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("End node 'end' cannot be the source")),
        "{:?}",
        report.errors
    );
}

#[test]
fn test_start_node_as_edge_target_is_rejected() {
    let mut workflow = reimbursement_workflow();
    workflow.edges.push(WorkflowEdge::new("director", "start"));

    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("Start node 'start' cannot be the target"))
    );
}

#[test]
fn test_fan_out_limits() {
    let mut workflow = reimbursement_workflow();
    workflow
        .edges
        .push(WorkflowEdge::new("amount_check", "manager"));
    workflow.edges.push(WorkflowEdge::new("manager", "end"));

    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(report.errors.contains(
        &"Condition node 'amount_check' has 3 outgoing edges, at most 2 allowed".to_string()
    ));
    assert!(report.errors.contains(
        &"Approval node 'manager' has 2 outgoing edges, at most 1 allowed".to_string()
    ));
}

#[test]
fn test_dangling_edges_and_missing_start() {
    let mut workflow = reimbursement_workflow();
    workflow.nodes.retain(|node| node.id != "start");

    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(has_code(&report, "KS-GRAPH-001"));
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("exactly one start node, found 0"))
    );
}

#[test]
fn test_duplicate_ids_are_reported() {
    let mut workflow = reimbursement_workflow();
    workflow.nodes.push(approval_node("manager", &["u-x"]));
    let mut edge = WorkflowEdge::new("manager", "amount_check");
    edge.id = "e2".to_string();
    workflow.edges.push(edge);

    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(report.errors.contains(&"Duplicate node id 'manager'".to_string()));
    assert!(report.errors.contains(&"Duplicate edge id 'e2'".to_string()));
}

#[test]
fn test_specific_members_need_approvers() {
    let mut workflow = reimbursement_workflow();
    if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == "director") {
        node.kind = NodeKind::Approval(ApprovalConfig::default());
    }

    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(has_code(&report, "KS-GRAPH-006"));

    // A department-manager node resolves its approver at run time.
    if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == "director") {
        node.kind = NodeKind::Approval(ApprovalConfig {
            approver_type: ApproverType::DepartmentManager,
            ..ApprovalConfig::default()
        });
    }
    assert!(validate(&workflow.nodes, &workflow.edges).is_valid);
}

#[test]
fn test_condition_configuration_against_schema() {
    let validator = strict_validator();
    let replace_condition = |config: ConditionConfig| {
        let mut workflow = reimbursement_workflow();
        if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == "amount_check") {
            node.kind = NodeKind::Condition(config);
        }
        workflow
    };

    let unknown_field = replace_condition(ConditionConfig {
        field: "mileage".to_string(),
        operator: ConditionOperator::GreaterThan,
        value: "10".to_string(),
    });
    let report = validator.validate_workflow(&unknown_field);
    assert!(report.errors.iter().any(|e| e.contains("not part of form")));

    let unsupported = replace_condition(ConditionConfig {
        field: "reason".to_string(),
        operator: ConditionOperator::GreaterThan,
        value: "x".to_string(),
    });
    let report = validator.validate_workflow(&unsupported);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("'greater_than' which is not supported for text field 'reason'"))
    );

    let non_numeric = replace_condition(ConditionConfig {
        field: "amount".to_string(),
        operator: ConditionOperator::LessThan,
        value: "lots".to_string(),
    });
    let report = validator.validate_workflow(&non_numeric);
    assert!(report.errors.iter().any(|e| e.contains("non-numeric value 'lots'")));

    let empty_field = replace_condition(ConditionConfig {
        field: " ".to_string(),
        operator: ConditionOperator::Equals,
        value: "1".to_string(),
    });
    let report = validate(&empty_field.nodes, &empty_field.edges);
    assert!(report.errors.iter().any(|e| e.contains("has no field selected")));
}

#[test]
fn test_branch_labels() {
    let mut workflow = reimbursement_workflow();
    for edge in workflow.edges.iter_mut() {
        if edge.source == "amount_check" {
            edge.label = Some(YES_BRANCH.to_string());
        }
    }
    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(has_code(&report, "KS-GRAPH-008"));

    let mut workflow = reimbursement_workflow();
    if let Some(edge) = workflow.edges.iter_mut().find(|e| e.id == "e4") {
        edge.label = Some("maybe".to_string());
    }
    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(report.is_valid);
    assert!(report.warnings.iter().any(|w| w.contains("'maybe'")));
}

#[test]
fn test_connectivity_is_a_warning_unless_required() {
    let mut workflow = reimbursement_workflow();
    workflow.nodes.push(approval_node("orphan", &["u-x"]));

    let lenient = validate(&workflow.nodes, &workflow.edges);
    assert!(lenient.is_valid);
    assert!(
        lenient
            .warnings
            .contains(&"Node 'orphan' is not reachable from the start node".to_string())
    );

    let strict = strict_validator().validate_workflow(&workflow);
    assert!(!strict.is_valid);
    assert!(
        strict
            .diagnostics
            .iter()
            .filter(|d| d.code == "KS-GRAPH-009")
            .all(|d| d.severity == Severity::Error)
    );
}

#[test]
fn test_dead_end_and_unreachable_end() {
    let nodes = unconnected_nodes();
    let edges = vec![WorkflowEdge::new("start", "a1")];
    let report = Validator::builder()
        .require_connectivity(true)
        .build()
        .validate(&nodes, &edges);
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .contains(&"No end node is reachable from start node 'start'".to_string())
    );
    assert!(
        report
            .errors
            .contains(&"Node 'a1' has no outgoing edge".to_string())
    );
}

struct NoTitlelessNodes;

impl GraphRule for NoTitlelessNodes {
    fn code(&self) -> &'static str {
        "TEST-001"
    }

    fn check(&self, ctx: &RuleContext<'_, '_>) -> Vec<Diagnostic> {
        ctx.graph
            .nodes()
            .iter()
            .filter(|node| node.title.is_empty())
            .map(|node| {
                Diagnostic::warning(
                    self.code(),
                    format!("Node '{}' has no title", node.id),
                    Some(node.id.clone()),
                )
            })
            .collect()
    }
}

#[test]
fn test_custom_rules_run_after_built_ins() {
    let mut workflow = reimbursement_workflow();
    if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == "manager") {
        node.title.clear();
    }
    let report = Validator::builder()
        .with_rule(Box::new(NoTitlelessNodes))
        .build()
        .validate_workflow(&workflow);
    assert!(report.is_valid);
    assert_eq!(report.warnings, vec!["Node 'manager' has no title".to_string()]);
}

#[test]
fn test_editor_enforces_connection_limits() {
    let mut editor = GraphEditor::new(unconnected_nodes(), Vec::new());

    assert!(editor.connect("start", "a1").is_some());
    let before = editor.edges().to_vec();
    assert_eq!(editor.connect("start", "a2"), None);
    assert_eq!(editor.edges(), before.as_slice());

    assert!(editor.connect("a1", "c1").is_some());
    assert_eq!(editor.connect("a1", "a2"), None);

    assert!(editor.connect("c1", "a2").is_some());
    assert!(editor.connect("c1", "end").is_some());
    let before = editor.edges().to_vec();
    assert!(!editor.is_valid_connection("c1", "a1"));
    assert_eq!(editor.connect("c1", "a1"), None);
    assert_eq!(editor.edges(), before.as_slice());
}

#[test]
fn test_editor_rejects_terminal_violations() {
    let mut editor = GraphEditor::new(unconnected_nodes(), Vec::new());
    assert!(!editor.is_valid_connection("end", "a1"));
    assert!(!editor.is_valid_connection("a1", "start"));
    assert!(!editor.is_valid_connection("a1", "a1"));
    assert!(!editor.is_valid_connection("a1", "missing"));

    assert!(editor.connect("c1", "a1").is_some());
    assert!(!editor.is_valid_connection("c1", "a1"));
    assert!(editor.connect("end", "a1").is_none());
    assert_eq!(editor.edges().len(), 1);
}

#[test]
fn test_editor_labels_condition_branches() {
    let mut editor = GraphEditor::new(unconnected_nodes(), Vec::new());
    let yes = editor.connect("c1", "a2");
    let no = editor.connect("c1", "end");
    let label_of = |editor: &GraphEditor, id: &Option<String>| {
        editor
            .edges()
            .iter()
            .find(|e| Some(&e.id) == id.as_ref())
            .and_then(|e| e.label.clone())
    };
    assert_eq!(label_of(&editor, &yes).as_deref(), Some(YES_BRANCH));
    assert_eq!(label_of(&editor, &no).as_deref(), Some(NO_BRANCH));

    // Removing the yes branch frees its label for the next connection.
    editor.disconnect(yes.as_deref().unwrap()).unwrap();
    let again = editor.connect("c1", "a1");
    assert_eq!(label_of(&editor, &again).as_deref(), Some(YES_BRANCH));

    // Edges out of approval nodes stay unlabelled.
    let plain = editor.connect("a1", "a2");
    assert_eq!(label_of(&editor, &plain), None);
}

#[test]
fn test_editor_protects_start_and_end() {
    let mut editor = GraphEditor::new(unconnected_nodes(), Vec::new());
    assert_eq!(
        editor.remove_node("start"),
        Err(EditError::ImmutableNode("start".to_string()))
    );
    assert_eq!(
        editor.update_node("end", "Finish", NodeKind::End),
        Err(EditError::ImmutableNode("end".to_string()))
    );
    assert_eq!(
        editor.update_node("a1", "Start again", NodeKind::Start),
        Err(EditError::ImmutableNode("a1".to_string()))
    );
    assert_eq!(
        editor.remove_node("ghost"),
        Err(EditError::NodeNotFound("ghost".to_string()))
    );
    assert_eq!(
        editor.add_node(approval_node("a1", &[])),
        Err(EditError::DuplicateNode("a1".to_string()))
    );
    assert_eq!(
        editor.disconnect("nope"),
        Err(EditError::EdgeNotFound("nope".to_string()))
    );
}

#[test]
fn test_editor_node_changes() {
    let mut editor = GraphEditor::new(unconnected_nodes(), Vec::new());
    editor.connect("start", "a1");
    editor.connect("a1", "c1");
    editor.connect("c1", "end");

    let removed = editor.remove_node("a1").unwrap();
    assert_eq!(removed.id, "a1");
    assert_eq!(editor.edges().len(), 1);
    assert!(editor.edges().iter().all(|e| e.source != "a1" && e.target != "a1"));

    editor
        .update_node(
            "a2",
            "Amount check",
            NodeKind::Condition(ConditionConfig {
                field: "amount".to_string(),
                operator: ConditionOperator::LessThan,
                value: "100".to_string(),
            }),
        )
        .unwrap();
    let node = editor.node("a2").unwrap();
    assert_eq!(node.title, "Amount check");
    assert_eq!(node.node_type(), NodeType::Condition);

    let (nodes, edges) = editor.into_design();
    assert_eq!(nodes.len(), 4);
    assert_eq!(edges.len(), 1);
}

#[test]
fn test_random_connection_attempts_keep_the_graph_well_formed() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let mut nodes = unconnected_nodes();
        nodes.push(condition_node("c2", "amount", ConditionOperator::LessThan, "10"));
        nodes.push(approval_node("a3", &["u3"]));
        let ids: Vec<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let mut editor = GraphEditor::new(nodes, Vec::new());

        for _ in 0..60 {
            let source = &ids[rng.random_range(0..ids.len())];
            let target = &ids[rng.random_range(0..ids.len())];
            let before = editor.edges().len();
            let allowed = editor.is_valid_connection(source, target);
            let created = editor.connect(source, target);
            assert_eq!(allowed, created.is_some());
            assert_eq!(
                editor.edges().len(),
                before + usize::from(created.is_some())
            );
        }

        let graph = editor.graph();
        for node in graph.nodes() {
            assert!(graph.outgoing(&node.id).len() <= node.max_outgoing());
        }
        let report = validate(editor.nodes(), editor.edges());
        assert!(!has_code(&report, "KS-GRAPH-002"));
        assert!(!has_code(&report, "KS-GRAPH-003"));
        assert!(!has_code(&report, "KS-GRAPH-008"));
    }
}

#[test]
fn test_retyping_a_condition_node_keeps_fan_out_limits() {
    let mut editor = GraphEditor::new(unconnected_nodes(), Vec::new());
    editor.connect("c1", "a2");
    editor.connect("c1", "end");
    let before = editor.edges().to_vec();

    let approval = NodeKind::Approval(ApprovalConfig {
        approvers: vec!["u1".to_string()],
        ..ApprovalConfig::default()
    });
    assert_eq!(
        editor.update_node("c1", "Approve", approval.clone()),
        Err(EditError::FanOutExceeded {
            node_id: "c1".to_string(),
            outgoing: 2,
            limit: 1,
        })
    );
    assert_eq!(editor.edges(), before.as_slice());
    assert_eq!(editor.node("c1").map(|n| n.node_type()), Some(NodeType::Condition));

    // With one branch left the node may become an approval, without a branch label.
    let no_edge = editor
        .edges()
        .iter()
        .find(|e| e.label.as_deref() == Some(NO_BRANCH))
        .map(|e| e.id.clone())
        .unwrap();
    editor.disconnect(&no_edge).unwrap();
    editor.update_node("c1", "Approve", approval).unwrap();
    let remaining: Vec<&WorkflowEdge> = editor.edges().iter().filter(|e| e.source == "c1").collect();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].label, None);

    let report = validate(editor.nodes(), editor.edges());
    assert!(!has_code(&report, "KS-GRAPH-002"));
    assert!(!has_code(&report, "KS-GRAPH-008"));
}

#[test]
fn test_unlabelled_condition_branches_are_warned_about() {
    let mut workflow = reimbursement_workflow();
    if let Some(edge) = workflow.edges.iter_mut().find(|e| e.id == "e4") {
        edge.label = None;
    }
    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(report.is_valid);
    assert_eq!(
        report.warnings,
        vec!["Condition node 'amount_check' has an unlabelled branch 'e4'".to_string()]
    );
}

#[test]
fn test_contains_with_empty_comparison_is_reported() {
    let mut workflow = reimbursement_workflow();
    if let Some(node) = workflow.nodes.iter_mut().find(|n| n.id == "amount_check") {
        node.kind = NodeKind::Condition(ConditionConfig {
            field: "reason".to_string(),
            operator: ConditionOperator::NotContains,
            value: "  ".to_string(),
        });
    }
    let report = validate(&workflow.nodes, &workflow.edges);
    assert!(!report.is_valid);
    assert!(
        report
            .errors
            .iter()
            .any(|e| e.contains("'not_contains' with an empty comparison value"))
    );
}
