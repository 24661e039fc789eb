//! The individual exit-criteria checks.
//!
//! Each check inspects one facet of project/stage state. Checks that read
//! from the store convert read failures into a single generic blocking error
//! instead of propagating them, so one broken read cannot crash the pipeline.

use tracing::warn;

use stagegate_model::{DocumentStatus, Project, SubStageProgress, SubStageStatus, WorkflowStage};
use stagegate_store::{StoreError, WorkflowStore};

use crate::result::ExitCriteriaResult;

/// The closed set of exit-criteria checks.
///
/// Adding a rule to the pipeline means adding a variant here and mapping it
/// to a check function in [`ExitCriteriaCheck::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCriteriaCheck {
  /// Project-level preconditions independent of the stage.
  ProjectStatus,
  /// Required sub-stages of the current stage are completed.
  SubStageCompletion,
  /// Required document categories have an approved upload.
  DocumentRequirements,
  /// No pending approvals anywhere on the project.
  ApprovalRequirements,
}

impl ExitCriteriaCheck {
  /// Short label used in generated error messages and log fields.
  pub fn name(&self) -> &'static str {
    match self {
      ExitCriteriaCheck::ProjectStatus => "project status",
      ExitCriteriaCheck::SubStageCompletion => "sub-stage completion",
      ExitCriteriaCheck::DocumentRequirements => "document requirements",
      ExitCriteriaCheck::ApprovalRequirements => "approval requirements",
    }
  }

  /// Run this check. Never fails: store errors degrade to a blocking result.
  pub async fn run(
    &self,
    store: &dyn WorkflowStore,
    project: &Project,
    current_stage: &WorkflowStage,
    progress: &[SubStageProgress],
  ) -> ExitCriteriaResult {
    let outcome = match self {
      ExitCriteriaCheck::ProjectStatus => Ok(project_preconditions(project)),
      ExitCriteriaCheck::SubStageCompletion => {
        check_sub_stage_completion(store, current_stage, progress).await
      }
      ExitCriteriaCheck::DocumentRequirements => {
        check_document_requirements(store, project, current_stage).await
      }
      ExitCriteriaCheck::ApprovalRequirements => check_approval_requirements(store, project).await,
    };

    match outcome {
      Ok(result) => result,
      Err(e) => degraded(*self, project, &e),
    }
  }
}

/// The blocking result a check degrades to when its store read fails.
fn degraded(check: ExitCriteriaCheck, project: &Project, error: &StoreError) -> ExitCriteriaResult {
  warn!(
    check = check.name(),
    project_id = %project.project_id,
    error = %error,
    "exit criteria check failed"
  );
  let mut result = ExitCriteriaResult::new();
  result.add_error(
    format!("Failed to validate {}", check.name()),
    format!("Retry validation of {}", check.name()),
  );
  result
}

/// Stage-independent validation for a project that has not yet entered the
/// pipeline: the project preconditions plus the approval gate, which is
/// global and applies to entry just like any other advancement. The
/// stage-scoped checks do not apply.
pub async fn entry_criteria(store: &dyn WorkflowStore, project: &Project) -> ExitCriteriaResult {
  let mut result = project_preconditions(project);
  let approvals = match check_approval_requirements(store, project).await {
    Ok(r) => r,
    Err(e) => degraded(ExitCriteriaCheck::ApprovalRequirements, project, &e),
  };
  result.merge(approvals);
  result
}

/// Project-level preconditions: active status, title, assigned customer.
/// Synchronous; operates only on the project already in hand.
pub fn project_preconditions(project: &Project) -> ExitCriteriaResult {
  let mut result = ExitCriteriaResult::new();

  if !project.status.is_active() {
    result.add_error(
      format!("Project is not active (status: {:?})", project.status),
      "Activate project".to_string(),
    );
  }
  if project.title.trim().is_empty() {
    result.add_error("Project title is missing", "Set a project title");
  }
  if project.customer_id.is_none() {
    result.add_error("Project has no customer assigned", "Assign a customer");
  }

  result
}

/// Join the current stage's required sub-stages against the project's
/// progress records. The required set is flat; no sub-stage depends on
/// another's completion.
async fn check_sub_stage_completion(
  store: &dyn WorkflowStore,
  current_stage: &WorkflowStage,
  progress: &[SubStageProgress],
) -> Result<ExitCriteriaResult, StoreError> {
  let required = store
    .fetch_required_sub_stages(&current_stage.stage_id)
    .await?;

  let mut result = ExitCriteriaResult::new();
  for sub_stage in &required {
    let record = progress
      .iter()
      .find(|p| p.sub_stage_id == sub_stage.sub_stage_id);

    match record.map(|r| r.status) {
      None => result.add_error(
        format!("Sub-stage not started: {}", sub_stage.name),
        format!("Start {}", sub_stage.name),
      ),
      Some(SubStageStatus::Pending) => result.add_error(
        format!("Sub-stage pending: {}", sub_stage.name),
        format!("Complete {}", sub_stage.name),
      ),
      Some(SubStageStatus::InProgress) => result.add_warning(
        format!("Sub-stage in progress: {}", sub_stage.name),
        format!("Complete {}", sub_stage.name),
      ),
      Some(SubStageStatus::Blocked) => result.add_error(
        format!("Sub-stage blocked: {}", sub_stage.name),
        format!("Resolve blockers for {}", sub_stage.name),
      ),
      Some(SubStageStatus::Completed) => {}
    }
  }

  Ok(result)
}

/// Required document categories must each have at least one approved upload.
/// A present-but-unapproved upload is a warning, not an error.
async fn check_document_requirements(
  store: &dyn WorkflowStore,
  project: &Project,
  current_stage: &WorkflowStage,
) -> Result<ExitCriteriaResult, StoreError> {
  let requirements = store
    .fetch_document_requirements(&current_stage.stage_id)
    .await?;

  let mut result = ExitCriteriaResult::new();
  for requirement in requirements.iter().filter(|r| r.is_required) {
    let label = requirement.category_label();
    let documents = store
      .fetch_documents(&project.project_id, &requirement.category_id)
      .await?;

    if documents.is_empty() {
      result.add_error(
        format!("Required document missing: {}", label),
        format!("Upload {}", label),
      );
    } else if !documents
      .iter()
      .any(|d| d.status == DocumentStatus::Approved)
    {
      result.add_warning(
        format!("Document pending approval: {}", label),
        format!("Get approval for {}", label),
      );
    }
  }

  Ok(result)
}

/// Any pending approval on the project blocks advancement, regardless of
/// which stage or entity it belongs to. A global gate, not a per-stage gate.
async fn check_approval_requirements(
  store: &dyn WorkflowStore,
  project: &Project,
) -> Result<ExitCriteriaResult, StoreError> {
  let pending = store.fetch_pending_approvals(&project.project_id).await?;

  let mut result = ExitCriteriaResult::new();
  for approval in &pending {
    result.add_error(
      format!("Pending approval: {}", approval.title),
      format!("Obtain decision for {}", approval.title),
    );
  }

  Ok(result)
}
