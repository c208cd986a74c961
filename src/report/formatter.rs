use crate::graph::{Severity, ValidationReport};
use crate::status::{InstanceProgress, NodeStatus};

/// Formats validation reports and instance progress into human-readable text.
pub struct ReportFormatter;

impl ReportFormatter {
    /// One line per diagnostic, errors first.
    pub fn format_validation(report: &ValidationReport) -> String {
        let mut lines = Vec::with_capacity(report.diagnostics.len() + 1);
        lines.push(if report.is_valid {
            format!("Workflow is valid ({} warning(s))", report.warnings.len())
        } else {
            format!(
                "Workflow is invalid: {} error(s), {} warning(s)",
                report.errors.len(),
                report.warnings.len()
            )
        });

        for severity in [Severity::Error, Severity::Warning] {
            for diagnostic in report.diagnostics.iter().filter(|d| d.severity == severity) {
                lines.push(format!(
                    "  [{}] {}: {}",
                    diagnostic.code, diagnostic.severity, diagnostic.message
                ));
            }
        }
        lines.join("\n")
    }

    /// The visible nodes of an instance, in display order, with their approvers.
    pub fn format_progress(progress: &InstanceProgress) -> String {
        let mut lines = vec![format!(
            "Instance {}: {}",
            progress.instance_id, progress.status
        )];

        for node in progress.visible_nodes() {
            let marker = match node.status {
                NodeStatus::Completed => "✔",
                NodeStatus::Rejected => "✘",
                NodeStatus::Running => "…",
                NodeStatus::Pending => "·",
            };
            let current = if node.is_current { " <- next" } else { "" };
            lines.push(format!(
                "  {} {} ({}) {}{}",
                marker, node.title, node.node_id, node.status, current
            ));
            for task in &node.tasks {
                let comments = task
                    .comments
                    .as_deref()
                    .map_or(String::new(), |c| format!(": {}", c));
                lines.push(format!(
                    "      - {} {}{}",
                    task.assigned_to, task.status, comments
                ));
            }
        }

        if let Some(halted) = &progress.halted_at {
            lines.push(format!("  Halted at rejected node '{}'", halted));
        }
        if !progress.unknown.is_empty() {
            lines.push(format!(
                "  {} task(s) reference unknown nodes:",
                progress.unknown.len()
            ));
            for task in &progress.unknown {
                lines.push(format!(
                    "      - {} (node {}) {}",
                    task.id,
                    task.node_id.as_deref().unwrap_or("<missing>"),
                    task.status
                ));
            }
        }
        lines.join("\n")
    }
}
