use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stagegate_model::{Approval, DocumentRequirement, Project, SubStageProgress, WorkflowStage};
use stagegate_validate::WorkflowValidation;
use stagegate_workflow::StageFlag;

/// Where the session currently is in its load cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
  /// No project loaded yet.
  Idle,
  /// A load is in flight.
  Loading,
  /// The last load succeeded and its state is cached.
  Loaded,
  /// The last load failed.
  Error(String),
}

/// The assembled workflow view for one project, exposed to presentation
/// collaborators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectWorkflowState {
  pub project: Project,
  /// `None` when the project has not entered the pipeline yet.
  pub current_stage: Option<WorkflowStage>,
  pub sub_stage_progress: Vec<SubStageProgress>,
  pub pending_approvals: Vec<Approval>,
  /// Document requirements of the current stage.
  pub required_documents: Vec<DocumentRequirement>,
  /// Movement flags for every stage in the organization's pipeline.
  pub next_possible_stages: Vec<StageFlag>,
  pub validation: WorkflowValidation,
  pub loaded_at: DateTime<Utc>,
}
