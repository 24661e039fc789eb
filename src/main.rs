use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stagegate_session::{AdvanceOutcome, ProjectWorkflowState, WorkflowSession};
use stagegate_store::{MemoryStore, Seed};

/// Stagegate - stage advancement and exit-criteria validation for
/// manufacturing project pipelines
#[derive(Parser)]
#[command(name = "stagegate")]
#[command(version, about, long_about = None)]
struct Cli {
  /// Path to the JSON state file holding projects, stages and progress
  #[arg(long, global = true, default_value = "stagegate.json")]
  state: PathBuf,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Report a project's exit criteria for its current stage
  Validate {
    /// The project ID to validate
    project: String,
  },

  /// Attempt to move a project to a target stage
  Advance {
    /// The project ID to advance
    project: String,

    /// The target stage ID
    #[arg(long)]
    stage: String,

    /// Reason recorded with the advancement
    #[arg(long)]
    reason: Option<String>,
  },

  /// Print a project's workflow history
  History {
    /// The project ID
    project: String,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let store = load_store(&cli.state).await?;

  match cli.command {
    Commands::Validate { project } => {
      run_validate(store, &project).await?;
    }
    Commands::Advance {
      project,
      stage,
      reason,
    } => {
      run_advance(store, &cli.state, &project, &stage, reason.as_deref()).await?;
    }
    Commands::History { project } => {
      run_history(store, &project).await?;
    }
  }

  Ok(())
}

async fn load_store(path: &Path) -> Result<MemoryStore> {
  let content = tokio::fs::read_to_string(path)
    .await
    .with_context(|| format!("failed to read state file: {}", path.display()))?;
  let seed: Seed = serde_json::from_str(&content)
    .with_context(|| format!("failed to parse state file: {}", path.display()))?;
  Ok(MemoryStore::from_seed(seed))
}

async fn save_store(store: &MemoryStore, path: &Path) -> Result<()> {
  let content = serde_json::to_string_pretty(&store.snapshot())?;
  tokio::fs::write(path, content)
    .await
    .with_context(|| format!("failed to write state file: {}", path.display()))?;
  Ok(())
}

async fn run_validate(store: MemoryStore, project_id: &str) -> Result<()> {
  let session = WorkflowSession::new(Arc::new(store));
  let state = session
    .load_workflow_state(project_id)
    .await
    .with_context(|| format!("failed to load workflow state for '{}'", project_id))?;

  print_state(&state);
  session.shutdown().await;
  Ok(())
}

async fn run_advance(
  store: MemoryStore,
  path: &Path,
  project_id: &str,
  target_stage_id: &str,
  reason: Option<&str>,
) -> Result<()> {
  let session = WorkflowSession::new(Arc::new(store.clone()));
  let outcome = session
    .advance_stage(project_id, target_stage_id, reason)
    .await
    .with_context(|| format!("failed to advance project '{}'", project_id))?;

  // Flush queued audit events before snapshotting the store.
  session.shutdown().await;

  match outcome {
    AdvanceOutcome::Advanced { state } => {
      println!("Advanced '{}' to stage '{}'", project_id, target_stage_id);
      if let Some(state) = state {
        print_state(&state);
      }
    }
    AdvanceOutcome::Rejected { validation } => {
      println!("Advancement rejected: exit criteria not met");
      for error in &validation.errors {
        println!("  error:  {}", error);
      }
      for action in &validation.exit_criteria {
        println!("  action: {}", action);
      }
    }
  }

  save_store(&store, path).await?;
  Ok(())
}

async fn run_history(store: MemoryStore, project_id: &str) -> Result<()> {
  let session = WorkflowSession::new(Arc::new(store));
  let events = session
    .workflow_history(project_id)
    .await
    .with_context(|| format!("failed to load history for '{}'", project_id))?;

  if events.is_empty() {
    println!("No workflow events for '{}'", project_id);
  }
  for event in events {
    println!(
      "{}  {:?}  {}",
      event.created_at.format("%Y-%m-%d %H:%M:%S"),
      event.kind,
      event.description
    );
  }
  session.shutdown().await;
  Ok(())
}

fn print_state(state: &ProjectWorkflowState) {
  println!(
    "Project: {} ({})",
    state.project.title, state.project.project_id
  );
  match &state.current_stage {
    Some(stage) => println!("Stage: {} (order {})", stage.name, stage.stage_order),
    None => println!("Stage: not in pipeline"),
  }
  println!(
    "Can advance: {}",
    if state.validation.can_advance {
      "yes"
    } else {
      "no"
    }
  );

  for error in &state.validation.errors {
    println!("  error:   {}", error);
  }
  for warning in &state.validation.warnings {
    println!("  warning: {}", warning);
  }
  for action in &state.validation.exit_criteria {
    println!("  action:  {}", action);
  }

  let targets: Vec<_> = state
    .next_possible_stages
    .iter()
    .filter(|f| f.can_move_to)
    .collect();
  if !targets.is_empty() {
    println!("Possible moves:");
    for flag in targets {
      let marker = if flag.is_next_stage { " (next)" } else { "" };
      println!("  {} [{}]{}", flag.stage.name, flag.stage.stage_id, marker);
    }
  }
}
