use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status of an approval request. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
  Pending,
  Approved,
  Rejected,
}

impl ApprovalStatus {
  pub fn is_terminal(&self) -> bool {
    matches!(self, ApprovalStatus::Approved | ApprovalStatus::Rejected)
  }
}

/// The kind of entity an approval is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalEntityType {
  Project,
  Document,
  Rfq,
}

/// A decision request tied to an entity.
///
/// Any pending approval referencing a project blocks that project's stage
/// advancement, regardless of which stage or entity type it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Approval {
  pub approval_id: String,
  pub project_id: String,
  /// Human-readable name of the approval chain this request belongs to.
  pub title: String,
  pub status: ApprovalStatus,
  pub entity_type: ApprovalEntityType,
  pub entity_id: String,
  pub approver_id: Option<String>,
  pub due_date: Option<DateTime<Utc>>,
  pub decision_reason: Option<String>,
  pub delegated_to: Option<String>,
  pub created_at: DateTime<Utc>,
  pub decided_at: Option<DateTime<Utc>>,
}
