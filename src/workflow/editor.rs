use super::conversion::IntoWorkflow;
use super::definition::*;
use crate::condition::ConditionOperator;
use crate::error::ConversionError;
use serde::{Deserialize, Serialize};

/// Workflow document as saved by the visual designer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorDocument {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "formType")]
    pub form_type: String,
    #[serde(default)]
    pub status: WorkflowStatus,
    pub nodes: Vec<EditorNode>,
    pub edges: Vec<EditorEdge>,
}

/// Designer node with its type tag and untyped configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub data: EditorNodeData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EditorNodeData {
    #[serde(default, alias = "title")]
    pub label: String,
    #[serde(alias = "approverType")]
    pub approver_type: Option<ApproverType>,
    #[serde(alias = "approvalType")]
    pub approval_type: Option<ApprovalType>,
    #[serde(default, alias = "specificApprovers")]
    pub approvers: Vec<String>,
    #[serde(default, alias = "allowAllocationEdit")]
    pub allow_allocation_edit: bool,
    pub field: Option<String>,
    pub operator: Option<String>,
    pub value: Option<serde_json::Value>,
}

/// Designer edge connecting two nodes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorEdge {
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    pub label: Option<String>,
}

impl EditorDocument {
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        serde_json::from_str(json).map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }

    /// Builds the designer document back from a typed workflow.
    pub fn from_workflow(workflow: &Workflow) -> Self {
        let nodes = workflow.nodes.iter().map(EditorNode::from_node).collect();
        let edges = workflow
            .edges
            .iter()
            .map(|edge| EditorEdge {
                id: Some(edge.id.clone()),
                source: edge.source.clone(),
                target: edge.target.clone(),
                label: edge.label.clone(),
            })
            .collect();

        Self {
            id: workflow.id.clone(),
            name: workflow.name.clone(),
            description: workflow.description.clone(),
            form_type: workflow.form_type.clone(),
            status: workflow.status,
            nodes,
            edges,
        }
    }
}

impl EditorNode {
    fn from_node(node: &WorkflowNode) -> Self {
        let mut data = EditorNodeData {
            label: node.title.clone(),
            ..EditorNodeData::default()
        };
        match &node.kind {
            NodeKind::Approval(config) => {
                data.approver_type = Some(config.approver_type);
                data.approval_type = Some(config.approval_type);
                data.approvers = config.approvers.clone();
                data.allow_allocation_edit = config.allow_allocation_edit;
            }
            NodeKind::Condition(config) => {
                data.field = Some(config.field.clone());
                data.operator = Some(config.operator.as_str().to_string());
                data.value = Some(serde_json::Value::String(config.value.clone()));
            }
            NodeKind::Start | NodeKind::End => {}
        }
        Self {
            id: node.id.clone(),
            node_type: node.node_type().to_string(),
            position: node.position,
            data,
        }
    }

    fn into_node(self) -> Result<WorkflowNode, ConversionError> {
        let kind = match self.node_type.as_str() {
            "start" => NodeKind::Start,
            "end" => NodeKind::End,
            "approval" => NodeKind::Approval(ApprovalConfig {
                approver_type: self
                    .data
                    .approver_type
                    .unwrap_or(ApproverType::SpecificMembers),
                approval_type: self.data.approval_type.unwrap_or(ApprovalType::Single),
                approvers: self.data.approvers,
                allow_allocation_edit: self.data.allow_allocation_edit,
            }),
            "condition" => {
                let field = self.data.field.ok_or_else(|| ConversionError::MissingConfig {
                    node_id: self.id.clone(),
                    field: "field".to_string(),
                })?;
                let raw_operator =
                    self.data
                        .operator
                        .ok_or_else(|| ConversionError::MissingConfig {
                            node_id: self.id.clone(),
                            field: "operator".to_string(),
                        })?;
                let operator = raw_operator.parse::<ConditionOperator>().map_err(|_| {
                    ConversionError::InvalidConfig {
                        node_id: self.id.clone(),
                        field: "operator".to_string(),
                        value: raw_operator.clone(),
                    }
                })?;
                NodeKind::Condition(ConditionConfig {
                    field,
                    operator,
                    value: self.data.value.map(json_to_comparison).unwrap_or_default(),
                })
            }
            other => {
                return Err(ConversionError::UnknownNodeType {
                    node_id: self.id,
                    type_name: other.to_string(),
                });
            }
        };

        Ok(WorkflowNode {
            id: self.id,
            title: self.data.label,
            position: self.position,
            kind,
        })
    }
}

/// The designer stores numbers and strings alike; arrays come from multi-selects.
fn json_to_comparison(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        serde_json::Value::Array(items) => items
            .into_iter()
            .map(json_to_comparison)
            .collect::<Vec<_>>()
            .join(","),
        other => other.to_string(),
    }
}

impl IntoWorkflow for EditorDocument {
    fn into_workflow(self) -> Result<Workflow, ConversionError> {
        let nodes = self
            .nodes
            .into_iter()
            .map(EditorNode::into_node)
            .collect::<Result<Vec<_>, _>>()?;

        let edges = self
            .edges
            .into_iter()
            .map(|raw| {
                let mut edge = WorkflowEdge::new(raw.source, raw.target);
                if let Some(id) = raw.id {
                    edge.id = id;
                }
                edge.label = raw.label.filter(|label| !label.is_empty());
                edge
            })
            .collect();

        Ok(Workflow {
            id: self.id,
            name: self.name,
            description: self.description,
            form_type: self.form_type,
            status: self.status,
            nodes,
            edges,
        })
    }
}

impl Workflow {
    /// Parses a designer JSON document straight into a typed workflow.
    pub fn from_json(json: &str) -> Result<Self, ConversionError> {
        EditorDocument::from_json(json)?.into_workflow()
    }

    pub fn to_json(&self) -> Result<String, ConversionError> {
        serde_json::to_string_pretty(&EditorDocument::from_workflow(self))
            .map_err(|e| ConversionError::JsonParseError(e.to_string()))
    }
}
