//! The composite validator.

use tracing::debug;

use stagegate_model::{Project, SubStageProgress, WorkflowStage};
use stagegate_store::WorkflowStore;

use crate::checks::ExitCriteriaCheck;
use crate::result::ExitCriteriaResult;

/// Runs every registered exit-criteria check and merges their findings.
///
/// Checks run sequentially; there is no data dependency between them, the
/// order is kept for simplicity and does not affect the merged result.
/// A failing check contributes exactly one generic blocking error and does
/// not suppress the findings of the others.
pub struct CompositeExitCriteriaValidator {
  checks: Vec<ExitCriteriaCheck>,
}

impl CompositeExitCriteriaValidator {
  /// The default pipeline: project status, sub-stage completion, document
  /// requirements, approval requirements.
  pub fn new() -> Self {
    Self {
      checks: vec![
        ExitCriteriaCheck::ProjectStatus,
        ExitCriteriaCheck::SubStageCompletion,
        ExitCriteriaCheck::DocumentRequirements,
        ExitCriteriaCheck::ApprovalRequirements,
      ],
    }
  }

  /// A pipeline with a custom set of checks.
  pub fn with_checks(checks: Vec<ExitCriteriaCheck>) -> Self {
    Self { checks }
  }

  /// Validate whether the project may leave its current stage.
  ///
  /// Always returns a result; `can_advance` is true exactly when the merged
  /// error list is empty.
  pub async fn validate(
    &self,
    store: &dyn WorkflowStore,
    project: &Project,
    current_stage: &WorkflowStage,
    progress: &[SubStageProgress],
  ) -> ExitCriteriaResult {
    let mut merged = ExitCriteriaResult::new();

    for check in &self.checks {
      let result = check.run(store, project, current_stage, progress).await;
      debug!(
        check = check.name(),
        project_id = %project.project_id,
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "exit criteria check finished"
      );
      merged.merge(result);
    }

    merged
  }
}

impl Default for CompositeExitCriteriaValidator {
  fn default() -> Self {
    Self::new()
  }
}
