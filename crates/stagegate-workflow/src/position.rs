use serde::{Deserialize, Serialize};

/// Where a candidate stage sits relative to the current stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StagePosition {
  /// The candidate comes before the current stage in pipeline order.
  Completed,
  /// The candidate is the current stage.
  Current,
  /// The candidate comes after the current stage.
  Pending,
}

impl StagePosition {
  /// Classify a candidate stage by comparing pipeline orders.
  pub fn classify(current_order: i32, target_order: i32) -> Self {
    match target_order.cmp(&current_order) {
      std::cmp::Ordering::Less => StagePosition::Completed,
      std::cmp::Ordering::Equal => StagePosition::Current,
      std::cmp::Ordering::Greater => StagePosition::Pending,
    }
  }
}
