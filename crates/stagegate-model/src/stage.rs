use serde::{Deserialize, Serialize};

/// An ordered pipeline step belonging to an organization.
///
/// `stage_order` defines a total order across an organization's stages;
/// values are unique and strictly increasing. Advancement is meaningful
/// forward in this order, but explicit rollback to an earlier stage is
/// permitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowStage {
  pub stage_id: String,
  pub organization_id: String,
  pub name: String,
  pub slug: String,
  pub stage_order: i32,
  pub color: Option<String>,
  pub description: Option<String>,
  pub is_active: bool,
  /// User roles that own work in this stage.
  #[serde(default)]
  pub responsible_roles: Vec<String>,
  /// Free-text description of what must hold before leaving this stage.
  pub exit_criteria: Option<String>,
}

/// A required-or-optional child task of a stage.
///
/// This is the per-stage template; per-project state lives in
/// [`SubStageProgress`](crate::SubStageProgress).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSubStage {
  pub sub_stage_id: String,
  pub stage_id: String,
  pub name: String,
  pub sub_stage_order: i32,
  pub is_required: bool,
  pub requires_approval: bool,
  pub can_skip: bool,
  pub auto_advance: bool,
}
