//! Optimistic status overlay.
//!
//! While a sub-stage status write is in flight, the UI wants to show the
//! requested status rather than the last confirmed one. The overlay is an
//! explicit two-field model: confirmed records from the store plus an
//! optional pending change, resolved by a pure function. The overlay is
//! discarded as soon as the cache is invalidated and reloaded.

use stagegate_model::{SubStageProgress, SubStageStatus};

/// A locally pending status change not yet confirmed by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingStatusOverlay {
  pub sub_stage_id: String,
  pub status: SubStageStatus,
}

/// Resolve the effective progress view: confirmed records with the pending
/// overlay applied. An overlay referencing an unknown sub-stage is a no-op.
pub fn effective_progress(
  confirmed: &[SubStageProgress],
  overlay: Option<&PendingStatusOverlay>,
) -> Vec<SubStageProgress> {
  confirmed
    .iter()
    .map(|record| {
      let mut record = record.clone();
      if let Some(pending) = overlay {
        if pending.sub_stage_id == record.sub_stage_id {
          record.status = pending.status;
        }
      }
      record
    })
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  fn record(sub_stage_id: &str, status: SubStageStatus) -> SubStageProgress {
    SubStageProgress {
      progress_id: format!("prog-{}", sub_stage_id),
      project_id: "proj-1".to_string(),
      sub_stage_id: sub_stage_id.to_string(),
      stage_id: "stage-1".to_string(),
      status,
      assignee_id: None,
      started_at: None,
      completed_at: None,
      notes: None,
    }
  }

  #[test]
  fn no_overlay_is_passthrough() {
    let confirmed = vec![record("ss-a", SubStageStatus::Pending)];
    let effective = effective_progress(&confirmed, None);
    assert_eq!(effective, confirmed);
  }

  #[test]
  fn overlay_replaces_matching_status() {
    let confirmed = vec![
      record("ss-a", SubStageStatus::Pending),
      record("ss-b", SubStageStatus::InProgress),
    ];
    let overlay = PendingStatusOverlay {
      sub_stage_id: "ss-a".to_string(),
      status: SubStageStatus::InProgress,
    };
    let effective = effective_progress(&confirmed, Some(&overlay));
    assert_eq!(effective[0].status, SubStageStatus::InProgress);
    assert_eq!(effective[1], confirmed[1]);
  }

  #[test]
  fn overlay_for_unknown_sub_stage_is_noop() {
    let confirmed = vec![record("ss-a", SubStageStatus::Pending)];
    let overlay = PendingStatusOverlay {
      sub_stage_id: "ss-z".to_string(),
      status: SubStageStatus::Completed,
    };
    assert_eq!(effective_progress(&confirmed, Some(&overlay)), confirmed);
  }

  #[test]
  fn resolution_does_not_mutate_confirmed() {
    let confirmed = vec![record("ss-a", SubStageStatus::Pending)];
    let overlay = PendingStatusOverlay {
      sub_stage_id: "ss-a".to_string(),
      status: SubStageStatus::Blocked,
    };
    let _ = effective_progress(&confirmed, Some(&overlay));
    assert_eq!(confirmed[0].status, SubStageStatus::Pending);
  }
}
