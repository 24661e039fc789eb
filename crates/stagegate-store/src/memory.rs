//! In-memory store.
//!
//! Backs the CLI (state loaded from a JSON seed file) and the test suites.
//! Record-level invariants are enforced at write time: sub-stage status
//! transitions must be legal, advancement targets must exist and be active,
//! approval decisions must land on a still-pending approval.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;

use stagegate_model::{
  Approval, ApprovalStatus, Document, DocumentRequirement, Project, ProjectStatus,
  SubStageProgress, SubStageStatus, WorkflowEvent, WorkflowStage, WorkflowSubStage,
};

use crate::seed::Seed;
use crate::{StoreError, WorkflowStore};

#[derive(Debug, Default)]
struct Inner {
  projects: HashMap<String, Project>,
  stages: HashMap<String, WorkflowStage>,
  sub_stages: HashMap<String, WorkflowSubStage>,
  progress: Vec<SubStageProgress>,
  approvals: HashMap<String, Approval>,
  requirements: Vec<DocumentRequirement>,
  documents: Vec<Document>,
  events: Vec<WorkflowEvent>,
}

/// In-memory [`WorkflowStore`] implementation.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner: Arc<RwLock<Inner>>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build a store from a seed document.
  pub fn from_seed(seed: Seed) -> Self {
    let mut inner = Inner::default();
    for project in seed.projects {
      inner.projects.insert(project.project_id.clone(), project);
    }
    for stage in seed.stages {
      inner.stages.insert(stage.stage_id.clone(), stage);
    }
    for sub_stage in seed.sub_stages {
      inner
        .sub_stages
        .insert(sub_stage.sub_stage_id.clone(), sub_stage);
    }
    inner.progress = seed.progress;
    for approval in seed.approvals {
      inner
        .approvals
        .insert(approval.approval_id.clone(), approval);
    }
    inner.requirements = seed.document_requirements;
    inner.documents = seed.documents;
    inner.events = seed.events;

    Self {
      inner: Arc::new(RwLock::new(inner)),
    }
  }

  /// Dump the current contents back into a seed document.
  ///
  /// Output is sorted by ID so the CLI writes deterministic state files.
  pub fn snapshot(&self) -> Seed {
    let inner = self.inner.read().unwrap();

    let mut projects: Vec<_> = inner.projects.values().cloned().collect();
    projects.sort_by(|a, b| a.project_id.cmp(&b.project_id));
    let mut stages: Vec<_> = inner.stages.values().cloned().collect();
    stages.sort_by(|a, b| a.stage_id.cmp(&b.stage_id));
    let mut sub_stages: Vec<_> = inner.sub_stages.values().cloned().collect();
    sub_stages.sort_by(|a, b| a.sub_stage_id.cmp(&b.sub_stage_id));
    let mut approvals: Vec<_> = inner.approvals.values().cloned().collect();
    approvals.sort_by(|a, b| a.approval_id.cmp(&b.approval_id));

    Seed {
      projects,
      stages,
      sub_stages,
      progress: inner.progress.clone(),
      approvals,
      document_requirements: inner.requirements.clone(),
      documents: inner.documents.clone(),
      events: inner.events.clone(),
    }
  }
}

#[async_trait]
impl WorkflowStore for MemoryStore {
  async fn fetch_project(&self, project_id: &str) -> Result<Project, StoreError> {
    let inner = self.inner.read().unwrap();
    inner
      .projects
      .get(project_id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(format!("project '{}'", project_id)))
  }

  async fn fetch_stage(&self, stage_id: &str) -> Result<WorkflowStage, StoreError> {
    let inner = self.inner.read().unwrap();
    inner
      .stages
      .get(stage_id)
      .cloned()
      .ok_or_else(|| StoreError::NotFound(format!("stage '{}'", stage_id)))
  }

  async fn fetch_stages_for_organization(
    &self,
    organization_id: &str,
  ) -> Result<Vec<WorkflowStage>, StoreError> {
    let inner = self.inner.read().unwrap();
    let mut stages: Vec<_> = inner
      .stages
      .values()
      .filter(|s| s.organization_id == organization_id)
      .cloned()
      .collect();
    stages.sort_by_key(|s| s.stage_order);
    Ok(stages)
  }

  async fn fetch_required_sub_stages(
    &self,
    stage_id: &str,
  ) -> Result<Vec<WorkflowSubStage>, StoreError> {
    let inner = self.inner.read().unwrap();
    let mut sub_stages: Vec<_> = inner
      .sub_stages
      .values()
      .filter(|s| s.stage_id == stage_id && s.is_required)
      .cloned()
      .collect();
    sub_stages.sort_by_key(|s| s.sub_stage_order);
    Ok(sub_stages)
  }

  async fn fetch_sub_stage_progress(
    &self,
    project_id: &str,
  ) -> Result<Vec<SubStageProgress>, StoreError> {
    let inner = self.inner.read().unwrap();
    Ok(
      inner
        .progress
        .iter()
        .filter(|p| p.project_id == project_id)
        .cloned()
        .collect(),
    )
  }

  async fn fetch_document_requirements(
    &self,
    stage_id: &str,
  ) -> Result<Vec<DocumentRequirement>, StoreError> {
    let inner = self.inner.read().unwrap();
    Ok(
      inner
        .requirements
        .iter()
        .filter(|r| r.stage_id == stage_id)
        .cloned()
        .collect(),
    )
  }

  async fn fetch_documents(
    &self,
    project_id: &str,
    category_id: &str,
  ) -> Result<Vec<Document>, StoreError> {
    let inner = self.inner.read().unwrap();
    Ok(
      inner
        .documents
        .iter()
        .filter(|d| d.project_id == project_id && d.category_id == category_id)
        .cloned()
        .collect(),
    )
  }

  async fn fetch_pending_approvals(&self, project_id: &str) -> Result<Vec<Approval>, StoreError> {
    let inner = self.inner.read().unwrap();
    Ok(
      inner
        .approvals
        .values()
        .filter(|a| a.project_id == project_id && a.status == ApprovalStatus::Pending)
        .cloned()
        .collect(),
    )
  }

  async fn write_stage_advancement(
    &self,
    project_id: &str,
    target_stage_id: &str,
    _reason: Option<&str>,
  ) -> Result<(), StoreError> {
    let mut inner = self.inner.write().unwrap();

    let stage = inner
      .stages
      .get(target_stage_id)
      .ok_or_else(|| StoreError::NotFound(format!("stage '{}'", target_stage_id)))?;
    if !stage.is_active {
      return Err(StoreError::Conflict(format!(
        "stage '{}' is not active",
        stage.name
      )));
    }
    let stage_org = stage.organization_id.clone();

    let project = inner
      .projects
      .get_mut(project_id)
      .ok_or_else(|| StoreError::NotFound(format!("project '{}'", project_id)))?;
    if !project.status.is_active() {
      return Err(StoreError::Conflict(format!(
        "project '{}' is not active",
        project.title
      )));
    }
    if project.organization_id != stage_org {
      return Err(StoreError::Conflict(
        "stage belongs to a different organization".to_string(),
      ));
    }

    project.current_stage_id = Some(target_stage_id.to_string());
    project.updated_at = Utc::now();
    Ok(())
  }

  async fn write_project_status(
    &self,
    project_id: &str,
    status: ProjectStatus,
  ) -> Result<(), StoreError> {
    let mut inner = self.inner.write().unwrap();
    let project = inner
      .projects
      .get_mut(project_id)
      .ok_or_else(|| StoreError::NotFound(format!("project '{}'", project_id)))?;
    project.status = status;
    project.updated_at = Utc::now();
    Ok(())
  }

  async fn write_sub_stage_progress(
    &self,
    project_id: &str,
    sub_stage_id: &str,
    status: SubStageStatus,
  ) -> Result<(), StoreError> {
    let mut inner = self.inner.write().unwrap();

    if !inner.projects.contains_key(project_id) {
      return Err(StoreError::NotFound(format!("project '{}'", project_id)));
    }

    let existing = inner
      .progress
      .iter()
      .position(|p| p.project_id == project_id && p.sub_stage_id == sub_stage_id);

    match existing {
      Some(index) => {
        let record = &mut inner.progress[index];
        if !record.status.can_transition_to(status) {
          return Err(StoreError::Conflict(format!(
            "sub-stage '{}' cannot move from {:?} to {:?}",
            sub_stage_id, record.status, status
          )));
        }
        record.status = status;
        let now = Utc::now();
        match status {
          SubStageStatus::InProgress if record.started_at.is_none() => {
            record.started_at = Some(now);
          }
          SubStageStatus::Completed => record.completed_at = Some(now),
          _ => {}
        }
        Ok(())
      }
      None => {
        // First write for this pair creates the record.
        let template = inner
          .sub_stages
          .get(sub_stage_id)
          .ok_or_else(|| StoreError::NotFound(format!("sub-stage '{}'", sub_stage_id)))?;
        if status != SubStageStatus::Pending
          && !SubStageStatus::Pending.can_transition_to(status)
        {
          return Err(StoreError::Conflict(format!(
            "sub-stage '{}' has not been started",
            sub_stage_id
          )));
        }
        let now = Utc::now();
        let record = SubStageProgress {
          progress_id: uuid::Uuid::new_v4().to_string(),
          project_id: project_id.to_string(),
          sub_stage_id: sub_stage_id.to_string(),
          stage_id: template.stage_id.clone(),
          status,
          assignee_id: None,
          started_at: (status == SubStageStatus::InProgress).then_some(now),
          completed_at: None,
          notes: None,
        };
        inner.progress.push(record);
        Ok(())
      }
    }
  }

  async fn write_approval_decision(
    &self,
    approval_id: &str,
    status: ApprovalStatus,
    reason: Option<&str>,
  ) -> Result<(), StoreError> {
    if !status.is_terminal() {
      return Err(StoreError::Conflict(
        "approval decision must be approved or rejected".to_string(),
      ));
    }

    let mut inner = self.inner.write().unwrap();
    let approval = inner
      .approvals
      .get_mut(approval_id)
      .ok_or_else(|| StoreError::NotFound(format!("approval '{}'", approval_id)))?;
    if approval.status.is_terminal() {
      return Err(StoreError::Conflict(format!(
        "approval '{}' is already decided",
        approval.title
      )));
    }

    approval.status = status;
    approval.decision_reason = reason.map(str::to_string);
    approval.decided_at = Some(Utc::now());
    Ok(())
  }

  async fn append_audit_event(&self, event: &WorkflowEvent) -> Result<(), StoreError> {
    let mut inner = self.inner.write().unwrap();
    inner.events.push(event.clone());
    Ok(())
  }

  async fn fetch_audit_events(&self, project_id: &str) -> Result<Vec<WorkflowEvent>, StoreError> {
    let inner = self.inner.read().unwrap();
    let mut events: Vec<_> = inner
      .events
      .iter()
      .filter(|e| e.project_id == project_id)
      .cloned()
      .collect();
    events.sort_by_key(|e| e.created_at);
    Ok(events)
  }
}
