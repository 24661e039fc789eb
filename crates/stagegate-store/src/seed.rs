use serde::{Deserialize, Serialize};

use stagegate_model::{
  Approval, Document, DocumentRequirement, Project, SubStageProgress, WorkflowEvent,
  WorkflowStage, WorkflowSubStage,
};

/// Serializable snapshot of a store's contents.
///
/// The CLI reads one of these from a JSON state file and writes it back after
/// mutating operations; tests use it to build fixtures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seed {
  #[serde(default)]
  pub projects: Vec<Project>,
  #[serde(default)]
  pub stages: Vec<WorkflowStage>,
  #[serde(default)]
  pub sub_stages: Vec<WorkflowSubStage>,
  #[serde(default)]
  pub progress: Vec<SubStageProgress>,
  #[serde(default)]
  pub approvals: Vec<Approval>,
  #[serde(default)]
  pub document_requirements: Vec<DocumentRequirement>,
  #[serde(default)]
  pub documents: Vec<Document>,
  #[serde(default)]
  pub events: Vec<WorkflowEvent>,
}
