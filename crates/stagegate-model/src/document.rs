use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Review status of an uploaded document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
  Uploaded,
  PendingApproval,
  Approved,
  Rejected,
}

/// A document uploaded against a project, filed under a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
  pub document_id: String,
  pub project_id: String,
  pub category_id: String,
  pub name: String,
  pub status: DocumentStatus,
  pub uploaded_at: DateTime<Utc>,
}

/// A per-stage document requirement tied to a document category.
///
/// `category_name` is denormalized from the category lookup; when the join
/// fails to resolve it stays `None` and readers fall back to "Unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRequirement {
  pub requirement_id: String,
  pub stage_id: String,
  pub category_id: String,
  pub category_name: Option<String>,
  pub is_required: bool,
}

impl DocumentRequirement {
  /// Display label for the required category.
  pub fn category_label(&self) -> &str {
    self.category_name.as_deref().unwrap_or("Unknown")
  }
}
