use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of audit event appended to a project's workflow history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowEventKind {
  StageAdvanced,
  StatusChanged,
  SubStageUpdated,
  ApprovalDecided,
  ValidationFailed,
}

/// An audit-trail entry. Appended best-effort; losing one never fails the
/// operation that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEvent {
  pub event_id: String,
  pub project_id: String,
  pub kind: WorkflowEventKind,
  pub description: String,
  pub actor_id: Option<String>,
  #[serde(default)]
  pub metadata: serde_json::Value,
  pub created_at: DateTime<Utc>,
}
