use clap::{Parser, Subcommand};
use kessai::allocation::{into_submission, shares_from_configs};
use kessai::prelude::*;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

/// Approval workflow validation, routing and status tool
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Log decisions made by the engine
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a workflow design
    Validate {
        /// Path to the workflow JSON file
        workflow_path: String,
        /// Optional form schema JSON used to check condition nodes
        #[arg(long)]
        schema: Option<String>,
        /// Treat unreachable nodes as errors
        #[arg(long)]
        strict: bool,
        /// Write a binary snapshot of the design when it is valid
        #[arg(long)]
        snapshot: Option<String>,
    },
    /// Show the progress of a workflow instance from its task records
    Status {
        workflow_path: String,
        tasks_path: String,
        /// The node the engine will activate next
        #[arg(long)]
        current_node: Option<String>,
        #[arg(long, default_value = "instance")]
        instance_id: String,
    },
    /// Resolve which branch a condition node takes for a record
    Route {
        workflow_path: String,
        node_id: String,
        record_path: String,
        #[arg(long)]
        schema: Option<String>,
    },
    /// Split an amount across enabled team allocations
    Allocate {
        /// Path to the team allocation configs JSON file
        configs_path: String,
        #[arg(long)]
        amount: f64,
        /// Team ids to include; all enabled teams when omitted
        #[arg(long = "select")]
        selected: Vec<String>,
    },
    /// Compute mileage performance from a tier configuration
    Performance {
        tiers_path: String,
        #[arg(long)]
        mileage: f64,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let start = Instant::now();
    match cli.command {
        Command::Validate {
            workflow_path,
            schema,
            strict,
            snapshot,
        } => run_validate(&workflow_path, schema.as_deref(), strict, snapshot.as_deref()),
        Command::Status {
            workflow_path,
            tasks_path,
            current_node,
            instance_id,
        } => run_status(&workflow_path, &tasks_path, current_node, instance_id),
        Command::Route {
            workflow_path,
            node_id,
            record_path,
            schema,
        } => run_route(&workflow_path, &node_id, &record_path, schema.as_deref()),
        Command::Allocate {
            configs_path,
            amount,
            selected,
        } => run_allocate(&configs_path, amount, &selected),
        Command::Performance {
            tiers_path,
            mileage,
        } => run_performance(&tiers_path, mileage),
    }
    tracing::debug!(elapsed = ?start.elapsed(), "done");
}

fn init_logging(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(workflow_path: &str, schema_path: Option<&str>, strict: bool, snapshot: Option<&str>) {
    let workflow = load_workflow(workflow_path);
    let mut builder = Validator::builder().require_connectivity(strict);
    if let Some(path) = schema_path {
        builder = builder.with_schema(load_schema(path));
    }
    let report = builder.build().validate_workflow(&workflow);
    println!("{}", ReportFormatter::format_validation(&report));

    if !report.is_valid {
        std::process::exit(2);
    }
    if let Some(path) = snapshot {
        WorkflowSnapshot::new(workflow, report.warnings)
            .save(path)
            .unwrap_or_else(|e| exit_with_error(&format!("Failed to save snapshot: {}", e)));
        println!("  -> Wrote snapshot to '{}'", path);
    }
}

fn run_status(
    workflow_path: &str,
    tasks_path: &str,
    current_node_id: Option<String>,
    instance_id: String,
) {
    let workflow = load_workflow(workflow_path);
    let tasks = Task::tasks_from_json(&read_file(tasks_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse tasks JSON: {}", e)));

    let instance = WorkflowInstance {
        id: instance_id,
        workflow_id: workflow.id.clone(),
        current_node_id,
    };
    let graph = WorkflowGraph::from_workflow(&workflow);
    let progress = InstanceProgress::build(&graph, &instance, &tasks);
    println!("{}", ReportFormatter::format_progress(&progress));
}

fn run_route(workflow_path: &str, node_id: &str, record_path: &str, schema_path: Option<&str>) {
    let workflow = load_workflow(workflow_path);
    let data = EntityData::from_file(record_path).unwrap_or_else(|e| {
        exit_with_error(&format!("Failed to load record from '{}': {}", record_path, e))
    });
    let schema = schema_path.map(load_schema);
    let evaluator = match &schema {
        Some(schema) => ConditionEvaluator::new(schema),
        None => ConditionEvaluator::without_schema(),
    };

    let graph = WorkflowGraph::from_workflow(&workflow);
    let edge = resolve_branch(&graph, node_id, &evaluator, &data)
        .unwrap_or_else(|e| exit_with_error(&format!("Routing failed: {}", e)));
    println!(
        "  -> Branch '{}' to node '{}'",
        edge.label.as_deref().unwrap_or("-"),
        edge.target
    );
}

fn run_allocate(configs_path: &str, amount: f64, selected: &[String]) {
    let configs: Vec<TeamAllocationConfig> = serde_json::from_str(&read_file(configs_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse configs JSON: {}", e)));

    let shares: Vec<AllocationShare> = shares_from_configs(&configs)
        .into_iter()
        .map(|share| {
            let keep = selected.is_empty() || selected.contains(&share.team_id);
            share.selected(keep)
        })
        .collect();
    let shares = recompute(&shares, amount);

    for share in &shares {
        println!(
            "  {} ({}): {} -> {:.2}",
            share.team_name,
            share.team_id,
            Percent::from_fraction(share.allocation_ratio),
            share.display_amount()
        );
    }
    match into_submission(&shares) {
        Ok(lines) => println!("  -> {} allocation line(s) ready to submit", lines.len()),
        Err(e) => exit_with_error(&format!("Allocation cannot be submitted: {}", e)),
    }
}

fn run_performance(tiers_path: &str, mileage: f64) {
    let config: MileageRateConfig = serde_json::from_str(&read_file(tiers_path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse tiers JSON: {}", e)));
    println!(
        "  -> Performance for {} km: {:.2}",
        mileage,
        performance(Some(&config), mileage)
    );
}

fn load_workflow(path: &str) -> Workflow {
    Workflow::from_json(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to load workflow: {}", e)))
}

fn load_schema(path: &str) -> FormSchema {
    FormSchema::from_json(&read_file(path))
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to parse schema JSON: {}", e)))
}

fn read_file(path: &str) -> String {
    fs::read_to_string(path)
        .unwrap_or_else(|e| exit_with_error(&format!("Failed to read file '{}': {}", path, e)))
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("\nError: {}", message);
    std::process::exit(1);
}
