use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a project.
///
/// Only `Active` projects are eligible for stage advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
  Active,
  Completed,
  Cancelled,
  OnHold,
}

impl ProjectStatus {
  /// Whether the project may still move through the pipeline.
  pub fn is_active(&self) -> bool {
    matches!(self, ProjectStatus::Active)
  }
}

/// A unit of work moving through the stage pipeline.
///
/// A project has at most one current stage at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
  pub project_id: String,
  pub organization_id: String,
  pub title: String,
  pub status: ProjectStatus,
  /// The stage the project currently occupies, if it has entered the pipeline.
  pub current_stage_id: Option<String>,
  pub priority: Option<String>,
  /// Customer this project is quoted for. Required before leaving any stage.
  pub customer_id: Option<String>,
  pub estimated_value: Option<f64>,
  pub notes: Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_active_is_active() {
    assert!(ProjectStatus::Active.is_active());
    assert!(!ProjectStatus::Completed.is_active());
    assert!(!ProjectStatus::Cancelled.is_active());
    assert!(!ProjectStatus::OnHold.is_active());
  }

  #[test]
  fn status_serializes_snake_case() {
    let json = serde_json::to_string(&ProjectStatus::OnHold).unwrap();
    assert_eq!(json, "\"on_hold\"");
  }
}
