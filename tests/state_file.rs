//! Smoke test for the JSON state-file format the CLI consumes.

use std::sync::Arc;

use stagegate_session::WorkflowSession;
use stagegate_store::{MemoryStore, Seed};

const STATE: &str = r#"{
  "projects": [{
    "project_id": "proj-1",
    "organization_id": "org-1",
    "title": "Acme Bracket RFQ",
    "status": "active",
    "current_stage_id": "stage-review",
    "priority": "high",
    "customer_id": "cust-acme",
    "estimated_value": 12500.0,
    "notes": null,
    "created_at": "2026-08-01T09:00:00Z",
    "updated_at": "2026-08-01T09:00:00Z"
  }],
  "stages": [{
    "stage_id": "stage-review",
    "organization_id": "org-1",
    "name": "Engineering Review",
    "slug": "engineering-review",
    "stage_order": 2,
    "color": null,
    "description": null,
    "is_active": true,
    "responsible_roles": ["engineer"],
    "exit_criteria": "Drawings approved and signed off"
  }],
  "document_requirements": [{
    "requirement_id": "req-1",
    "stage_id": "stage-review",
    "category_id": "cat-drawings",
    "category_name": "Drawing Package",
    "is_required": true
  }]
}"#;

#[tokio::test]
async fn state_file_loads_and_validates() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("stagegate.json");
  std::fs::write(&path, STATE).unwrap();

  let content = std::fs::read_to_string(&path).unwrap();
  let seed: Seed = serde_json::from_str(&content).unwrap();
  let store = MemoryStore::from_seed(seed);

  let session = WorkflowSession::new(Arc::new(store.clone()));
  let state = session.load_workflow_state("proj-1").await.unwrap();

  assert!(!state.validation.can_advance);
  assert_eq!(
    state.validation.errors,
    vec!["Required document missing: Drawing Package"]
  );

  // Snapshot writes back a parseable state file.
  let out = serde_json::to_string_pretty(&store.snapshot()).unwrap();
  std::fs::write(&path, &out).unwrap();
  let reparsed: Seed = serde_json::from_str(&out).unwrap();
  assert_eq!(reparsed.projects.len(), 1);

  session.shutdown().await;
}
