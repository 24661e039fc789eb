//! Stagegate Store
//!
//! This crate defines the capability contract between the workflow engine and
//! whatever backend holds project state. The [`WorkflowStore`] trait covers:
//! - Reads the exit-criteria validators need (projects, stages, sub-stage
//!   progress, document requirements, pending approvals)
//! - Writes issued by the session layer (stage advancement, status updates,
//!   approval decisions)
//! - The best-effort audit trail
//!
//! [`MemoryStore`] is the in-process implementor used by tests and the CLI.
//! A hosted relational backend would implement the same trait; this crate
//! deliberately knows nothing about any particular database.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::Seed;

use async_trait::async_trait;

use stagegate_model::{
  Approval, ApprovalStatus, Document, DocumentRequirement, Project, ProjectStatus,
  SubStageProgress, SubStageStatus, WorkflowEvent, WorkflowStage, WorkflowSubStage,
};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The requested record was not found.
  #[error("not found: {0}")]
  NotFound(String),

  /// The write conflicts with the current state of the record.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The backend failed to serve the request.
  #[error("backend error: {0}")]
  Backend(String),
}

/// Storage contract for workflow state.
///
/// All reads are independent snapshots; the engine does not assume any
/// transaction spanning multiple calls.
#[async_trait]
pub trait WorkflowStore: Send + Sync {
  /// Fetch a project by ID.
  async fn fetch_project(&self, project_id: &str) -> Result<Project, StoreError>;

  /// Fetch a workflow stage by ID.
  async fn fetch_stage(&self, stage_id: &str) -> Result<WorkflowStage, StoreError>;

  /// Fetch all stages for an organization, ordered by `stage_order`.
  async fn fetch_stages_for_organization(
    &self,
    organization_id: &str,
  ) -> Result<Vec<WorkflowStage>, StoreError>;

  /// Fetch the required sub-stages of a stage, ordered by `sub_stage_order`.
  async fn fetch_required_sub_stages(
    &self,
    stage_id: &str,
  ) -> Result<Vec<WorkflowSubStage>, StoreError>;

  /// Fetch all sub-stage progress records for a project.
  async fn fetch_sub_stage_progress(
    &self,
    project_id: &str,
  ) -> Result<Vec<SubStageProgress>, StoreError>;

  /// Fetch the document requirements attached to a stage.
  async fn fetch_document_requirements(
    &self,
    stage_id: &str,
  ) -> Result<Vec<DocumentRequirement>, StoreError>;

  /// Fetch the documents uploaded for a project under one category.
  async fn fetch_documents(
    &self,
    project_id: &str,
    category_id: &str,
  ) -> Result<Vec<Document>, StoreError>;

  /// Fetch all pending approvals referencing a project.
  async fn fetch_pending_approvals(&self, project_id: &str) -> Result<Vec<Approval>, StoreError>;

  /// Move a project to the target stage.
  async fn write_stage_advancement(
    &self,
    project_id: &str,
    target_stage_id: &str,
    reason: Option<&str>,
  ) -> Result<(), StoreError>;

  /// Update a project's lifecycle status.
  async fn write_project_status(
    &self,
    project_id: &str,
    status: ProjectStatus,
  ) -> Result<(), StoreError>;

  /// Update (or create) the progress record for a (project, sub-stage) pair.
  async fn write_sub_stage_progress(
    &self,
    project_id: &str,
    sub_stage_id: &str,
    status: SubStageStatus,
  ) -> Result<(), StoreError>;

  /// Record a terminal decision on a pending approval.
  async fn write_approval_decision(
    &self,
    approval_id: &str,
    status: ApprovalStatus,
    reason: Option<&str>,
  ) -> Result<(), StoreError>;

  /// Append an audit event. Callers treat this as best-effort.
  async fn append_audit_event(&self, event: &WorkflowEvent) -> Result<(), StoreError>;

  /// Fetch the audit trail for a project, oldest first.
  async fn fetch_audit_events(&self, project_id: &str) -> Result<Vec<WorkflowEvent>, StoreError>;
}
