use chrono::{Duration, Utc};
use clap::Parser;
use kessai::prelude::*;
use rand::{Rng, rngs::ThreadRng};
use std::fs;

/// A CLI tool to generate task histories for a kessai workflow
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the workflow JSON file to generate tasks for
    workflow_path: String,

    /// The path to write the generated tasks JSON file to
    #[arg(short, long, default_value = "generated_tasks.json")]
    output: String,

    /// Probability that the active node ends in a rejection
    #[arg(long, default_value_t = 0.2)]
    reject_rate: f64,

    /// Number of tasks pointing at nodes that no longer exist
    #[arg(long, default_value_t = 0)]
    orphans: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut rng = rand::rng();

    if !(0.0..=1.0).contains(&cli.reject_rate) {
        eprintln!(
            "Error: --reject-rate ({}) must be between 0 and 1",
            cli.reject_rate
        );
        std::process::exit(1);
    }

    let workflow = Workflow::from_json(&fs::read_to_string(&cli.workflow_path)?)?;
    let graph = WorkflowGraph::from_workflow(&workflow);
    let approval_nodes: Vec<&WorkflowNode> = graph
        .display_order()
        .into_iter()
        .filter(|node| node.node_type() == NodeType::Approval)
        .collect();

    println!(
        "Generating task history for {} approval node(s) of '{}'...",
        approval_nodes.len(),
        workflow.name
    );

    let reached = rng.random_range(0..=approval_nodes.len());
    let instance_id = format!("inst-{}", rng.random_range(1000..10000));
    let mut tasks = Vec::new();

    for (index, node) in approval_nodes.iter().take(reached).enumerate() {
        let is_active = index + 1 == reached;
        for approver in approvers_for(node, &mut rng) {
            let status = if !is_active {
                TaskStatus::Approved
            } else if rng.random_bool(cli.reject_rate) {
                TaskStatus::Rejected
            } else if rng.random_bool(0.5) {
                TaskStatus::Pending
            } else {
                TaskStatus::Approved
            };
            tasks.push(make_task(&mut rng, tasks.len(), &instance_id, node, approver, status));
        }
    }

    for i in 0..cli.orphans {
        let mut task = Task::new(
            format!("orphan-{}", i),
            format!("deleted-node-{}", i),
            "u-archive",
            TaskStatus::Approved,
        );
        task.instance_id = instance_id.clone();
        tasks.push(task);
    }

    fs::write(&cli.output, serde_json::to_string_pretty(&tasks)?)?;
    println!(
        "Successfully generated {} task(s) ({} node(s) reached) and saved them to '{}'",
        tasks.len(),
        reached,
        cli.output
    );
    Ok(())
}

fn approvers_for(node: &WorkflowNode, rng: &mut ThreadRng) -> Vec<String> {
    match &node.kind {
        NodeKind::Approval(config) if !config.approvers.is_empty() => match config.approval_type
        {
            ApprovalType::All => config.approvers.clone(),
            ApprovalType::Single => {
                vec![config.approvers[rng.random_range(0..config.approvers.len())].clone()]
            }
        },
        _ => vec![format!("manager-{}", rng.random_range(1..50))],
    }
}

fn make_task(
    rng: &mut ThreadRng,
    sequence: usize,
    instance_id: &str,
    node: &WorkflowNode,
    approver: String,
    status: TaskStatus,
) -> Task {
    let mut task = Task::new(format!("task-{}", sequence + 1), node.id.clone(), approver, status);
    task.instance_id = instance_id.to_string();
    if status.is_terminal() {
        task.completed_at = Some(Utc::now() - Duration::minutes(rng.random_range(5..5000)));
        task.comments = Some(match status {
            TaskStatus::Rejected => "金额超出预算".to_string(),
            _ => "同意".to_string(),
        });
    }
    task
}
