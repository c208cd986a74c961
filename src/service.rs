use crate::allocation::TeamAllocationConfig;
use crate::condition::FormSchema;
use crate::error::{DecisionError, ServiceError};
use crate::graph::{ValidationReport, Validator};
use crate::status::{ApprovalDecision, Task};
use crate::workflow::{Workflow, WorkflowEdge, WorkflowNode, WorkflowStatus};
use ahash::AHashMap;
use chrono::Utc;
use tracing::{debug, info};

/// Workflow persistence, owned by the back-office API.
pub trait WorkflowStore {
    fn fetch_workflow(&self, workflow_id: &str) -> Result<Workflow, ServiceError>;

    /// The active workflow attached to an entity form type.
    fn fetch_for_form(&self, form_type: &str) -> Result<Workflow, ServiceError>;

    /// Replaces the node and edge sets of a workflow in one step.
    fn save_design(
        &mut self,
        workflow_id: &str,
        nodes: Vec<WorkflowNode>,
        edges: Vec<WorkflowEdge>,
    ) -> Result<(), ServiceError>;

    fn set_status(&mut self, workflow_id: &str, status: WorkflowStatus)
    -> Result<(), ServiceError>;

    fn form_schema(&self, form_type: &str) -> Result<FormSchema, ServiceError>;
}

/// Task records produced by the workflow engine.
pub trait TaskSource {
    fn tasks_for_instance(&self, instance_id: &str) -> Result<Vec<Task>, ServiceError>;

    fn tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, ServiceError>;

    /// Fire-and-forget from the caller's side; the engine accepts or rejects it.
    fn submit_decision(&mut self, decision: ApprovalDecision) -> Result<(), ServiceError>;
}

/// Team allocation settings.
pub trait AllocationConfigSource {
    fn enabled_team_allocations(&self) -> Result<Vec<TeamAllocationConfig>, ServiceError>;
}

/// Validates a design and saves it only when it has no errors.
pub fn publish_design<S: WorkflowStore + ?Sized>(
    store: &mut S,
    workflow_id: &str,
    nodes: Vec<WorkflowNode>,
    edges: Vec<WorkflowEdge>,
    validator: &Validator,
) -> Result<ValidationReport, ServiceError> {
    let report = validator.validate(&nodes, &edges);
    if !report.is_valid {
        return Err(ServiceError::DesignRejected {
            errors: report.errors,
        });
    }
    store.save_design(workflow_id, nodes, edges)?;
    info!(workflow = workflow_id, "saved workflow design");
    Ok(report)
}

/// Activates a stored workflow after re-validating its design.
pub fn activate<S: WorkflowStore + ?Sized>(
    store: &mut S,
    workflow_id: &str,
    validator: &Validator,
) -> Result<(), ServiceError> {
    let workflow = store.fetch_workflow(workflow_id)?;
    let report = validator.validate_workflow(&workflow);
    if !report.is_valid {
        return Err(ServiceError::DesignRejected {
            errors: report.errors,
        });
    }
    store.set_status(workflow_id, WorkflowStatus::Active)?;
    info!(workflow = workflow_id, "activated workflow");
    Ok(())
}

/// In-memory stand-in for the back-office services.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    workflows: AHashMap<String, Workflow>,
    schemas: AHashMap<String, FormSchema>,
    tasks: Vec<Task>,
    allocations: Vec<TeamAllocationConfig>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_workflow(&mut self, workflow: Workflow) {
        self.workflows.insert(workflow.id.clone(), workflow);
    }

    pub fn insert_schema(&mut self, schema: FormSchema) {
        self.schemas.insert(schema.form_type.clone(), schema);
    }

    pub fn insert_tasks(&mut self, tasks: impl IntoIterator<Item = Task>) {
        self.tasks.extend(tasks);
    }

    pub fn insert_allocation(&mut self, config: TeamAllocationConfig) {
        self.allocations.push(config);
    }

    fn workflow_mut(&mut self, workflow_id: &str) -> Result<&mut Workflow, ServiceError> {
        self.workflows
            .get_mut(workflow_id)
            .ok_or_else(|| ServiceError::NotFound {
                kind: "Workflow",
                id: workflow_id.to_string(),
            })
    }
}

impl WorkflowStore for MemoryStore {
    fn fetch_workflow(&self, workflow_id: &str) -> Result<Workflow, ServiceError> {
        self.workflows
            .get(workflow_id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "Workflow",
                id: workflow_id.to_string(),
            })
    }

    fn fetch_for_form(&self, form_type: &str) -> Result<Workflow, ServiceError> {
        self.workflows
            .values()
            .find(|w| w.form_type == form_type && w.status == WorkflowStatus::Active)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "Active workflow for form",
                id: form_type.to_string(),
            })
    }

    fn save_design(
        &mut self,
        workflow_id: &str,
        nodes: Vec<WorkflowNode>,
        edges: Vec<WorkflowEdge>,
    ) -> Result<(), ServiceError> {
        let workflow = self.workflow_mut(workflow_id)?;
        workflow.nodes = nodes;
        workflow.edges = edges;
        Ok(())
    }

    fn set_status(
        &mut self,
        workflow_id: &str,
        status: WorkflowStatus,
    ) -> Result<(), ServiceError> {
        self.workflow_mut(workflow_id)?.status = status;
        Ok(())
    }

    fn form_schema(&self, form_type: &str) -> Result<FormSchema, ServiceError> {
        self.schemas
            .get(form_type)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound {
                kind: "Form schema",
                id: form_type.to_string(),
            })
    }
}

impl TaskSource for MemoryStore {
    fn tasks_for_instance(&self, instance_id: &str) -> Result<Vec<Task>, ServiceError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.instance_id == instance_id)
            .cloned()
            .collect())
    }

    fn tasks_for_user(&self, user_id: &str) -> Result<Vec<Task>, ServiceError> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| t.assigned_to == user_id)
            .cloned()
            .collect())
    }

    fn submit_decision(&mut self, decision: ApprovalDecision) -> Result<(), ServiceError> {
        let task = self
            .tasks
            .iter_mut()
            .find(|t| t.id == decision.task_id)
            .ok_or_else(|| ServiceError::NotFound {
                kind: "Task",
                id: decision.task_id.clone(),
            })?;
        if !task.is_pending() {
            return Err(DecisionError::TaskNotPending(task.id.clone()).into());
        }
        task.status = decision.verdict.task_status();
        task.comments = Some(decision.comments);
        task.completed_at = Some(Utc::now());
        debug!(task = %task.id, status = %task.status, "recorded decision");
        Ok(())
    }
}

impl AllocationConfigSource for MemoryStore {
    fn enabled_team_allocations(&self) -> Result<Vec<TeamAllocationConfig>, ServiceError> {
        Ok(self
            .allocations
            .iter()
            .filter(|c| c.is_enabled)
            .cloned()
            .collect())
    }
}
