use super::WorkflowGraph;
use super::rules::{GraphRule, RuleContext, built_in_rules};
use crate::condition::FormSchema;
use crate::workflow::{Workflow, WorkflowEdge, WorkflowNode};
use serde::Serialize;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single finding from a validation rule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub node_id: Option<String>,
}

impl Diagnostic {
    pub fn new(
        code: &'static str,
        severity: Severity,
        message: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            node_id,
        }
    }

    pub fn error(code: &'static str, message: impl Into<String>, node_id: Option<String>) -> Self {
        Self::new(code, Severity::Error, message, node_id)
    }

    pub fn warning(
        code: &'static str,
        message: impl Into<String>,
        node_id: Option<String>,
    ) -> Self {
        Self::new(code, Severity::Warning, message, node_id)
    }
}

/// Outcome of validating a workflow design. All problems are collected so the
/// designer can show them at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        let messages = |severity: Severity| {
            diagnostics
                .iter()
                .filter(|d| d.severity == severity)
                .map(|d| d.message.clone())
                .collect::<Vec<_>>()
        };
        let errors = messages(Severity::Error);
        let warnings = messages(Severity::Warning);
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            diagnostics,
        }
    }
}

/// Runs the structural and configuration rules over a workflow design.
pub struct Validator {
    rules: Vec<Box<dyn GraphRule>>,
    schema: Option<FormSchema>,
}

pub struct ValidatorBuilder {
    schema: Option<FormSchema>,
    require_connectivity: bool,
    extra_rules: Vec<Box<dyn GraphRule>>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self {
            schema: None,
            require_connectivity: false,
            extra_rules: Vec::new(),
        }
    }

    /// Checks condition nodes against the fields of this form schema.
    pub fn with_schema(mut self, schema: FormSchema) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Makes start-to-end reachability findings errors instead of warnings.
    pub fn require_connectivity(mut self, required: bool) -> Self {
        self.require_connectivity = required;
        self
    }

    pub fn with_rule(mut self, rule: Box<dyn GraphRule>) -> Self {
        self.extra_rules.push(rule);
        self
    }

    pub fn build(self) -> Validator {
        let mut rules = built_in_rules(self.require_connectivity);
        rules.extend(self.extra_rules);
        Validator {
            rules,
            schema: self.schema,
        }
    }
}

impl Default for ValidatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for Validator {
    fn default() -> Self {
        ValidatorBuilder::new().build()
    }
}

impl Validator {
    pub fn builder() -> ValidatorBuilder {
        ValidatorBuilder::new()
    }

    pub fn validate(&self, nodes: &[WorkflowNode], edges: &[WorkflowEdge]) -> ValidationReport {
        let graph = WorkflowGraph::new(nodes, edges);
        let ctx = RuleContext {
            graph: &graph,
            schema: self.schema.as_ref(),
        };
        let diagnostics: Vec<Diagnostic> = self
            .rules
            .iter()
            .flat_map(|rule| rule.check(&ctx))
            .collect();

        let report = ValidationReport::from_diagnostics(diagnostics);
        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            errors = report.errors.len(),
            warnings = report.warnings.len(),
            "validated workflow design"
        );
        report
    }

    pub fn validate_workflow(&self, workflow: &Workflow) -> ValidationReport {
        self.validate(&workflow.nodes, &workflow.edges)
    }
}

/// Validates with the default rule set and no form schema.
pub fn validate(nodes: &[WorkflowNode], edges: &[WorkflowEdge]) -> ValidationReport {
    Validator::default().validate(nodes, edges)
}
