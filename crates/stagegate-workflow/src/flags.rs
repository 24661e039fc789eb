use serde::{Deserialize, Serialize};

use stagegate_model::WorkflowStage;

use crate::position::StagePosition;

/// Per-candidate movement affordances for one stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageFlag {
  pub stage: WorkflowStage,
  pub position: StagePosition,
  /// Whether this is the immediate next stage in pipeline order.
  pub is_next_stage: bool,
  /// Whether the project may move here right now. Rollback to earlier stages
  /// is permitted, so this is not restricted to forward moves.
  pub can_move_to: bool,
}

/// The immediate next active stage after `current`, if any.
pub fn next_stage<'a>(
  stages: &'a [WorkflowStage],
  current: &WorkflowStage,
) -> Option<&'a WorkflowStage> {
  stages
    .iter()
    .filter(|s| s.is_active && s.stage_order > current.stage_order)
    .min_by_key(|s| s.stage_order)
}

/// Compute movement flags for every candidate stage.
///
/// `validation_passed` is the current stage's exit-criteria verdict. When it
/// holds, the project may move to any other active stage, earlier ones
/// included.
pub fn stage_flags(
  stages: &[WorkflowStage],
  current: &WorkflowStage,
  validation_passed: bool,
) -> Vec<StageFlag> {
  let next_order = next_stage(stages, current).map(|s| s.stage_order);

  stages
    .iter()
    .map(|stage| {
      let position = StagePosition::classify(current.stage_order, stage.stage_order);
      StageFlag {
        is_next_stage: next_order == Some(stage.stage_order),
        can_move_to: validation_passed
          && stage.is_active
          && position != StagePosition::Current,
        position,
        stage: stage.clone(),
      }
    })
    .collect()
}
