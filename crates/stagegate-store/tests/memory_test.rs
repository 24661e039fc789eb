//! Tests for the in-memory store's reads and write-time invariants.

use chrono::Utc;

use stagegate_model::{
  Approval, ApprovalEntityType, ApprovalStatus, Project, ProjectStatus, SubStageStatus,
  WorkflowStage, WorkflowSubStage,
};
use stagegate_store::{MemoryStore, Seed, StoreError, WorkflowStore};

fn project(id: &str, org: &str) -> Project {
  Project {
    project_id: id.to_string(),
    organization_id: org.to_string(),
    title: "Acme Bracket RFQ".to_string(),
    status: ProjectStatus::Active,
    current_stage_id: Some("stage-1".to_string()),
    priority: None,
    customer_id: Some("cust-acme".to_string()),
    estimated_value: None,
    notes: None,
    created_at: Utc::now(),
    updated_at: Utc::now(),
  }
}

fn stage(id: &str, org: &str, order: i32, is_active: bool) -> WorkflowStage {
  WorkflowStage {
    stage_id: id.to_string(),
    organization_id: org.to_string(),
    name: format!("Stage {}", order),
    slug: format!("stage-{}", order),
    stage_order: order,
    color: None,
    description: None,
    is_active,
    responsible_roles: Vec::new(),
    exit_criteria: None,
  }
}

fn sub_stage(id: &str, stage_id: &str, order: i32, is_required: bool) -> WorkflowSubStage {
  WorkflowSubStage {
    sub_stage_id: id.to_string(),
    stage_id: stage_id.to_string(),
    name: id.to_string(),
    sub_stage_order: order,
    is_required,
    requires_approval: false,
    can_skip: false,
    auto_advance: false,
  }
}

fn seed() -> Seed {
  Seed {
    projects: vec![project("proj-1", "org-1")],
    stages: vec![
      // Inserted out of order on purpose.
      stage("stage-3", "org-1", 3, true),
      stage("stage-1", "org-1", 1, true),
      stage("stage-2", "org-1", 2, true),
      stage("stage-x", "org-2", 1, true),
      stage("stage-off", "org-1", 4, false),
    ],
    sub_stages: vec![
      sub_stage("ss-b", "stage-1", 2, true),
      sub_stage("ss-a", "stage-1", 1, true),
      sub_stage("ss-opt", "stage-1", 3, false),
      sub_stage("ss-other", "stage-2", 1, true),
    ],
    ..Seed::default()
  }
}

#[tokio::test]
async fn stages_for_organization_are_ordered() {
  let store = MemoryStore::from_seed(seed());
  let stages = store.fetch_stages_for_organization("org-1").await.unwrap();
  let orders: Vec<_> = stages.iter().map(|s| s.stage_order).collect();
  assert_eq!(orders, vec![1, 2, 3, 4]);
  assert!(stages.iter().all(|s| s.organization_id == "org-1"));
}

#[tokio::test]
async fn required_sub_stages_filtered_and_ordered() {
  let store = MemoryStore::from_seed(seed());
  let required = store.fetch_required_sub_stages("stage-1").await.unwrap();
  let ids: Vec<_> = required.iter().map(|s| s.sub_stage_id.as_str()).collect();
  assert_eq!(ids, vec!["ss-a", "ss-b"]);
}

#[tokio::test]
async fn missing_project_is_not_found() {
  let store = MemoryStore::from_seed(seed());
  let err = store.fetch_project("proj-ghost").await.unwrap_err();
  assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn advancement_moves_the_project() {
  let store = MemoryStore::from_seed(seed());
  store
    .write_stage_advancement("proj-1", "stage-2", Some("ready"))
    .await
    .unwrap();
  let project = store.fetch_project("proj-1").await.unwrap();
  assert_eq!(project.current_stage_id.as_deref(), Some("stage-2"));
}

#[tokio::test]
async fn advancement_rejects_inactive_stage() {
  let store = MemoryStore::from_seed(seed());
  let err = store
    .write_stage_advancement("proj-1", "stage-off", None)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn advancement_rejects_foreign_organization_stage() {
  let store = MemoryStore::from_seed(seed());
  let err = store
    .write_stage_advancement("proj-1", "stage-x", None)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn advancement_rejects_non_active_project() {
  let store = MemoryStore::from_seed(seed());
  store
    .write_project_status("proj-1", ProjectStatus::OnHold)
    .await
    .unwrap();
  let err = store
    .write_stage_advancement("proj-1", "stage-2", None)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn first_progress_write_creates_the_record() {
  let store = MemoryStore::from_seed(seed());
  store
    .write_sub_stage_progress("proj-1", "ss-a", SubStageStatus::InProgress)
    .await
    .unwrap();

  let records = store.fetch_sub_stage_progress("proj-1").await.unwrap();
  assert_eq!(records.len(), 1);
  assert_eq!(records[0].status, SubStageStatus::InProgress);
  assert_eq!(records[0].stage_id, "stage-1");
  assert!(records[0].started_at.is_some());
}

#[tokio::test]
async fn progress_transitions_are_enforced() {
  let store = MemoryStore::from_seed(seed());
  store
    .write_sub_stage_progress("proj-1", "ss-a", SubStageStatus::InProgress)
    .await
    .unwrap();

  // in_progress -> pending is not a legal move.
  let err = store
    .write_sub_stage_progress("proj-1", "ss-a", SubStageStatus::Pending)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Conflict(_)));

  store
    .write_sub_stage_progress("proj-1", "ss-a", SubStageStatus::Completed)
    .await
    .unwrap();
  let records = store.fetch_sub_stage_progress("proj-1").await.unwrap();
  assert!(records[0].completed_at.is_some());
}

#[tokio::test]
async fn progress_write_for_unknown_sub_stage_is_not_found() {
  let store = MemoryStore::from_seed(seed());
  let err = store
    .write_sub_stage_progress("proj-1", "ss-ghost", SubStageStatus::InProgress)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::NotFound(_)));
}

#[tokio::test]
async fn approval_decision_is_terminal_once() {
  let mut s = seed();
  s.approvals = vec![Approval {
    approval_id: "app-1".to_string(),
    project_id: "proj-1".to_string(),
    title: "Quality Chain".to_string(),
    status: ApprovalStatus::Pending,
    entity_type: ApprovalEntityType::Project,
    entity_id: "proj-1".to_string(),
    approver_id: None,
    due_date: None,
    decision_reason: None,
    delegated_to: None,
    created_at: Utc::now(),
    decided_at: None,
  }];
  let store = MemoryStore::from_seed(s);

  store
    .write_approval_decision("app-1", ApprovalStatus::Approved, Some("lgtm"))
    .await
    .unwrap();
  let pending = store.fetch_pending_approvals("proj-1").await.unwrap();
  assert!(pending.is_empty());

  let err = store
    .write_approval_decision("app-1", ApprovalStatus::Rejected, None)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn pending_is_not_a_decision() {
  let store = MemoryStore::from_seed(seed());
  let err = store
    .write_approval_decision("app-1", ApprovalStatus::Pending, None)
    .await
    .unwrap_err();
  assert!(matches!(err, StoreError::Conflict(_)));
}

#[tokio::test]
async fn snapshot_round_trips_through_json() {
  let store = MemoryStore::from_seed(seed());
  store
    .write_stage_advancement("proj-1", "stage-2", None)
    .await
    .unwrap();

  let snapshot = store.snapshot();
  let json = serde_json::to_string(&snapshot).unwrap();
  let reloaded: Seed = serde_json::from_str(&json).unwrap();
  assert_eq!(snapshot, reloaded);

  let restored = MemoryStore::from_seed(reloaded);
  let project = restored.fetch_project("proj-1").await.unwrap();
  assert_eq!(project.current_stage_id.as_deref(), Some("stage-2"));
}
