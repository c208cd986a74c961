//! Common test utilities for building workflows, tasks and allocation data.
use kessai::prelude::*;

/// Editor JSON for the reimbursement workflow used across suites.
///
/// start -> manager -> amount_check -(是)-> director -> end
///                                   -(否)-> end
#[allow(dead_code)]
pub const REIMBURSEMENT_JSON: &str = r#"{
    "id": "wf-reimburse",
    "name": "Expense reimbursement",
    "description": "Manager, then director above 5000",
    "formType": "expense_reimbursements",
    "status": "draft",
    "nodes": [
        { "id": "start", "type": "start", "position": { "x": 0, "y": 0 }, "data": { "label": "开始" } },
        { "id": "manager", "type": "approval", "position": { "x": 0, "y": 100 },
          "data": { "label": "Manager approval", "approverType": "specific_members",
                    "approvalType": "single", "approvers": ["u-mgr"], "allowAllocationEdit": true } },
        { "id": "amount_check", "type": "condition", "position": { "x": 0, "y": 200 },
          "data": { "label": "Amount over 5000", "field": "amount", "operator": "greater_than", "value": 5000 } },
        { "id": "director", "type": "approval", "position": { "x": 100, "y": 300 },
          "data": { "label": "Director approval", "approverType": "specific_members",
                    "approvalType": "all", "approvers": ["u-dir", "u-cfo"] } },
        { "id": "end", "type": "end", "position": { "x": 0, "y": 400 }, "data": { "label": "结束" } }
    ],
    "edges": [
        { "id": "e1", "source": "start", "target": "manager" },
        { "id": "e2", "source": "manager", "target": "amount_check" },
        { "id": "e3", "source": "amount_check", "target": "director", "label": "是" },
        { "id": "e4", "source": "amount_check", "target": "end", "label": "否" },
        { "id": "e5", "source": "director", "target": "end" }
    ]
}"#;

#[allow(dead_code)]
pub const REIMBURSEMENT_SCHEMA_JSON: &str = r#"{
    "formType": "expense_reimbursements",
    "fields": [
        { "name": "amount", "label": "金额", "type": "number" },
        { "name": "reason", "label": "事由", "type": "text" },
        { "name": "category", "label": "类别", "type": "select",
          "options": [ { "value": "travel", "label": "差旅" }, { "value": "meal", "label": "餐费" } ] },
        { "name": "department", "label": "部门", "type": "departments" },
        { "name": "approvers", "label": "审批人", "type": "users" }
    ]
}"#;

#[allow(dead_code)]
pub fn reimbursement_workflow() -> Workflow {
    Workflow::from_json(REIMBURSEMENT_JSON).expect("fixture workflow should parse")
}

#[allow(dead_code)]
pub fn reimbursement_schema() -> FormSchema {
    FormSchema::from_json(REIMBURSEMENT_SCHEMA_JSON).expect("fixture schema should parse")
}

#[allow(dead_code)]
pub fn approval_node(id: &str, approvers: &[&str]) -> WorkflowNode {
    WorkflowNode::new(
        id,
        format!("Approve {}", id),
        NodeKind::Approval(ApprovalConfig {
            approvers: approvers.iter().map(|a| a.to_string()).collect(),
            ..ApprovalConfig::default()
        }),
    )
}

#[allow(dead_code)]
pub fn condition_node(id: &str, field: &str, operator: ConditionOperator, value: &str) -> WorkflowNode {
    WorkflowNode::new(
        id,
        format!("Check {}", field),
        NodeKind::Condition(ConditionConfig {
            field: field.to_string(),
            operator,
            value: value.to_string(),
        }),
    )
}

/// Start, one approval, one condition, a second approval and an end node, unconnected.
#[allow(dead_code)]
pub fn unconnected_nodes() -> Vec<WorkflowNode> {
    vec![
        WorkflowNode::new("start", "Start", NodeKind::Start),
        approval_node("a1", &["u1"]),
        condition_node("c1", "amount", ConditionOperator::GreaterThan, "1000"),
        approval_node("a2", &["u2"]),
        WorkflowNode::new("end", "End", NodeKind::End),
    ]
}

#[allow(dead_code)]
pub fn task(id: &str, node_id: &str, assigned_to: &str, status: TaskStatus) -> Task {
    let mut task = Task::new(id, node_id, assigned_to, status);
    task.instance_id = "inst-1".to_string();
    task
}

#[allow(dead_code)]
pub fn instance(current_node_id: Option<&str>) -> WorkflowInstance {
    WorkflowInstance {
        id: "inst-1".to_string(),
        workflow_id: "wf-reimburse".to_string(),
        current_node_id: current_node_id.map(str::to_string),
    }
}

#[allow(dead_code)]
pub fn share(team: &str, ratio: f64, selected: bool) -> AllocationShare {
    AllocationShare::new(team, format!("Team {}", team), ratio).selected(selected)
}
