use serde::{Deserialize, Serialize};

/// Output contract of every exit-criteria check.
///
/// `can_advance` is true if and only if `errors` is empty. Every mutator
/// below maintains that invariant, so a result is never observable in a
/// contradictory state. Warnings are surfaced but never block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExitCriteriaResult {
  pub can_advance: bool,
  /// Blocking findings. Each is paired with a `required_actions` entry.
  pub errors: Vec<String>,
  /// Non-blocking findings, surfaced to the user.
  pub warnings: Vec<String>,
  /// Human-readable remediation steps.
  pub required_actions: Vec<String>,
}

impl ExitCriteriaResult {
  /// An empty, passing result.
  pub fn new() -> Self {
    Self {
      can_advance: true,
      errors: Vec::new(),
      warnings: Vec::new(),
      required_actions: Vec::new(),
    }
  }

  /// Record a blocking finding with its remediation step.
  pub fn add_error(&mut self, error: impl Into<String>, action: impl Into<String>) {
    self.errors.push(error.into());
    self.required_actions.push(action.into());
    self.can_advance = false;
  }

  /// Record a non-blocking finding with its remediation step.
  pub fn add_warning(&mut self, warning: impl Into<String>, action: impl Into<String>) {
    self.warnings.push(warning.into());
    self.required_actions.push(action.into());
  }

  /// Merge another result into this one by concatenation. No deduplication.
  pub fn merge(&mut self, other: ExitCriteriaResult) {
    self.errors.extend(other.errors);
    self.warnings.extend(other.warnings);
    self.required_actions.extend(other.required_actions);
    self.can_advance = self.errors.is_empty();
  }
}

impl Default for ExitCriteriaResult {
  fn default() -> Self {
    Self::new()
  }
}

/// Validation summary consumed by presentation layers.
///
/// `exit_criteria` is the human-readable list of outstanding requirements
/// for the current stage, derived from the pipeline's required actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowValidation {
  pub can_advance: bool,
  pub exit_criteria: Vec<String>,
  pub errors: Vec<String>,
  pub warnings: Vec<String>,
}

impl From<&ExitCriteriaResult> for WorkflowValidation {
  fn from(result: &ExitCriteriaResult) -> Self {
    Self {
      can_advance: result.can_advance,
      exit_criteria: result.required_actions.clone(),
      errors: result.errors.clone(),
      warnings: result.warnings.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_result_passes() {
    let result = ExitCriteriaResult::new();
    assert!(result.can_advance);
    assert!(result.errors.is_empty());
  }

  #[test]
  fn error_blocks_and_pairs_action() {
    let mut result = ExitCriteriaResult::new();
    result.add_error("missing title", "Set a project title");
    assert!(!result.can_advance);
    assert_eq!(result.errors.len(), result.required_actions.len());
  }

  #[test]
  fn warning_does_not_block() {
    let mut result = ExitCriteriaResult::new();
    result.add_warning("document pending approval", "Get approval");
    assert!(result.can_advance);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.required_actions.len(), 1);
  }

  #[test]
  fn merge_concatenates_without_dedup() {
    let mut a = ExitCriteriaResult::new();
    a.add_warning("w", "act");
    let mut b = ExitCriteriaResult::new();
    b.add_warning("w", "act");
    b.add_error("e", "fix");
    a.merge(b);
    assert_eq!(a.warnings, vec!["w", "w"]);
    assert_eq!(a.required_actions, vec!["act", "act", "fix"]);
    assert!(!a.can_advance);
  }

  #[test]
  fn merge_recomputes_can_advance_from_errors() {
    let mut a = ExitCriteriaResult::new();
    let b = ExitCriteriaResult::new();
    a.merge(b);
    assert!(a.can_advance);
  }
}
