use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of a sub-stage for one project.
///
/// Legal transitions: pending -> in_progress -> completed. `Blocked` is
/// reachable from pending or in_progress and must return to in_progress
/// once the blocker is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubStageStatus {
  Pending,
  InProgress,
  Completed,
  Blocked,
}

impl SubStageStatus {
  /// Whether moving from `self` to `next` is a legal transition.
  pub fn can_transition_to(&self, next: SubStageStatus) -> bool {
    use SubStageStatus::*;
    match (self, next) {
      (Pending, InProgress) => true,
      (InProgress, Completed) => true,
      (Pending, Blocked) | (InProgress, Blocked) => true,
      (Blocked, InProgress) => true,
      _ => false,
    }
  }
}

/// Per-project state of one sub-stage.
///
/// There is exactly one progress record per (project, sub-stage) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubStageProgress {
  pub progress_id: String,
  pub project_id: String,
  pub sub_stage_id: String,
  pub stage_id: String,
  pub status: SubStageStatus,
  pub assignee_id: Option<String>,
  pub started_at: Option<DateTime<Utc>>,
  pub completed_at: Option<DateTime<Utc>>,
  pub notes: Option<String>,
}
