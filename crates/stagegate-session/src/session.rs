//! The workflow session.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{error, info, instrument, warn};

use stagegate_model::{
  ApprovalStatus, Project, ProjectStatus, SubStageStatus, WorkflowEvent, WorkflowEventKind,
};
use stagegate_store::WorkflowStore;
use stagegate_validate::{CompositeExitCriteriaValidator, WorkflowValidation, entry_criteria};
use stagegate_workflow::{StageFlag, StagePosition, stage_flags};

use crate::audit::AuditLogger;
use crate::error::SessionError;
use crate::overlay::{PendingStatusOverlay, effective_progress};
use crate::state::{ProjectWorkflowState, SessionPhase};

/// Outcome of a stage-advancement request.
///
/// A rejection is a normal, user-visible outcome, not an error: the project
/// simply does not meet its exit criteria yet and nothing was written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AdvanceOutcome {
  /// The stage write succeeded. `state` is the reloaded view; it is `None`
  /// when the best-effort reload failed, which does not undo the write.
  Advanced { state: Option<ProjectWorkflowState> },
  /// Exit criteria are not met; state is unchanged.
  Rejected { validation: WorkflowValidation },
}

/// Result of a bulk approval decision. Per-item failures do not fail the
/// batch; the caller reports partial success.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkDecisionOutcome {
  pub succeeded: usize,
  pub failed: usize,
  /// (approval_id, failure message) for each failed item.
  pub failures: Vec<(String, String)>,
}

/// Orchestrates workflow state for projects against a backing store.
///
/// Owns a per-project cache of [`ProjectWorkflowState`]. The cache has no
/// expiry; every mutating operation invalidates the affected entry, and
/// `refresh_workflow_state` forces a fresh load.
pub struct WorkflowSession {
  store: Arc<dyn WorkflowStore>,
  validator: CompositeExitCriteriaValidator,
  cache: RwLock<HashMap<String, ProjectWorkflowState>>,
  phase: RwLock<SessionPhase>,
  audit: AuditLogger,
  drain: JoinHandle<()>,
}

impl WorkflowSession {
  /// Create a session over a store. Spawns the audit drain task, so this
  /// must be called from within a tokio runtime.
  pub fn new(store: Arc<dyn WorkflowStore>) -> Self {
    let (audit, drain) = AuditLogger::spawn(store.clone());
    Self {
      store,
      validator: CompositeExitCriteriaValidator::new(),
      cache: RwLock::new(HashMap::new()),
      phase: RwLock::new(SessionPhase::Idle),
      audit,
      drain,
    }
  }

  /// Current load-cycle phase.
  pub fn phase(&self) -> SessionPhase {
    self.phase.read().unwrap().clone()
  }

  fn set_phase(&self, phase: SessionPhase) {
    *self.phase.write().unwrap() = phase;
  }

  /// The cached state for a project, if a load has succeeded since the last
  /// invalidation. Never triggers a fetch.
  pub fn workflow_state(&self, project_id: &str) -> Option<ProjectWorkflowState> {
    self.cache.read().unwrap().get(project_id).cloned()
  }

  /// Load and cache the full workflow view for a project.
  #[instrument(name = "load_workflow_state", skip(self), fields(project_id = %project_id))]
  pub async fn load_workflow_state(
    &self,
    project_id: &str,
  ) -> Result<ProjectWorkflowState, SessionError> {
    self.set_phase(SessionPhase::Loading);

    match self.assemble_state(project_id).await {
      Ok(state) => {
        self
          .cache
          .write()
          .unwrap()
          .insert(project_id.to_string(), state.clone());
        self.set_phase(SessionPhase::Loaded);
        info!(
          project_id = %project_id,
          can_advance = state.validation.can_advance,
          "workflow_state_loaded"
        );
        Ok(state)
      }
      Err(e) => {
        self.set_phase(SessionPhase::Error(e.to_string()));
        error!(project_id = %project_id, error = %e, "workflow_state_load_failed");
        Err(e)
      }
    }
  }

  async fn assemble_state(&self, project_id: &str) -> Result<ProjectWorkflowState, SessionError> {
    let project = self.store.fetch_project(project_id).await?;
    let progress = self.store.fetch_sub_stage_progress(project_id).await?;
    let pending_approvals = self.store.fetch_pending_approvals(project_id).await?;
    let stages = self
      .store
      .fetch_stages_for_organization(&project.organization_id)
      .await?;

    let (current_stage, required_documents, validation) = match &project.current_stage_id {
      Some(stage_id) => {
        let stage = self.store.fetch_stage(stage_id).await?;
        let required_documents = self.store.fetch_document_requirements(stage_id).await?;
        let result = self
          .validator
          .validate(self.store.as_ref(), &project, &stage, &progress)
          .await;
        (Some(stage), required_documents, WorkflowValidation::from(&result))
      }
      None => {
        // Not in the pipeline yet; the stage-scoped checks do not apply but
        // the approval gate still does.
        let result = entry_criteria(self.store.as_ref(), &project).await;
        (None, Vec::new(), WorkflowValidation::from(&result))
      }
    };

    let next_possible_stages = match &current_stage {
      Some(stage) => stage_flags(&stages, stage, validation.can_advance),
      None => {
        // Every active stage lies ahead of a project that has not entered
        // the pipeline; the entry stage is the lowest-ordered one.
        let entry_order = stages
          .iter()
          .filter(|s| s.is_active)
          .map(|s| s.stage_order)
          .min();
        stages
          .iter()
          .filter(|s| s.is_active)
          .map(|s| StageFlag {
            stage: s.clone(),
            position: StagePosition::Pending,
            is_next_stage: entry_order == Some(s.stage_order),
            can_move_to: validation.can_advance,
          })
          .collect()
      }
    };

    Ok(ProjectWorkflowState {
      project,
      current_stage,
      sub_stage_progress: progress,
      pending_approvals,
      required_documents,
      next_possible_stages,
      validation,
      loaded_at: Utc::now(),
    })
  }

  /// Request advancement of a project to a target stage.
  ///
  /// Exit criteria are re-validated against a fresh snapshot before the
  /// write; the store may still reject the write on its own checks. On
  /// success the cache is invalidated, an audit event goes out, and the
  /// state is reloaded best-effort.
  #[instrument(
    name = "advance_stage",
    skip(self),
    fields(project_id = %project_id, target_stage_id = %target_stage_id)
  )]
  pub async fn advance_stage(
    &self,
    project_id: &str,
    target_stage_id: &str,
    reason: Option<&str>,
  ) -> Result<AdvanceOutcome, SessionError> {
    let project = self.store.fetch_project(project_id).await?;
    let progress = self.store.fetch_sub_stage_progress(project_id).await?;

    let result = match &project.current_stage_id {
      Some(stage_id) => {
        let stage = self.store.fetch_stage(stage_id).await?;
        self
          .validator
          .validate(self.store.as_ref(), &project, &stage, &progress)
          .await
      }
      None => entry_criteria(self.store.as_ref(), &project).await,
    };

    if !result.can_advance {
      warn!(
        project_id = %project_id,
        errors = result.errors.len(),
        "stage_advance_rejected"
      );
      self.emit(
        project_id,
        WorkflowEventKind::ValidationFailed,
        format!("Advancement to stage '{}' rejected", target_stage_id),
        serde_json::json!({ "errors": result.errors }),
      );
      return Ok(AdvanceOutcome::Rejected {
        validation: WorkflowValidation::from(&result),
      });
    }

    self
      .store
      .write_stage_advancement(project_id, target_stage_id, reason)
      .await?;

    info!(project_id = %project_id, target_stage_id = %target_stage_id, "stage_advanced");
    self.clear_cache(Some(project_id));
    self.emit(
      project_id,
      WorkflowEventKind::StageAdvanced,
      format!("Advanced to stage '{}'", target_stage_id),
      serde_json::json!({
        "from_stage_id": project.current_stage_id,
        "target_stage_id": target_stage_id,
        "reason": reason,
      }),
    );

    // The write is the source of truth; a failed reload is not rolled back.
    let state = self.load_workflow_state(project_id).await.ok();
    Ok(AdvanceOutcome::Advanced { state })
  }

  /// Update a project's lifecycle status, then reload best-effort.
  #[instrument(name = "update_project_status", skip(self), fields(project_id = %project_id))]
  pub async fn update_project_status(
    &self,
    project_id: &str,
    status: ProjectStatus,
  ) -> Result<Option<ProjectWorkflowState>, SessionError> {
    self.store.write_project_status(project_id, status).await?;

    info!(project_id = %project_id, status = ?status, "project_status_updated");
    self.clear_cache(Some(project_id));
    self.emit(
      project_id,
      WorkflowEventKind::StatusChanged,
      format!("Project status changed to {:?}", status),
      serde_json::Value::Null,
    );

    Ok(self.load_workflow_state(project_id).await.ok())
  }

  /// Update one sub-stage's progress, then reload best-effort.
  ///
  /// The requested status is overlaid onto the cached view before the write
  /// so readers see the pending change immediately; the overlay disappears
  /// with the invalidation that follows the write.
  #[instrument(
    name = "update_sub_stage_progress",
    skip(self),
    fields(project_id = %project_id, sub_stage_id = %sub_stage_id)
  )]
  pub async fn update_sub_stage_progress(
    &self,
    project_id: &str,
    sub_stage_id: &str,
    status: SubStageStatus,
  ) -> Result<Option<ProjectWorkflowState>, SessionError> {
    let overlay = PendingStatusOverlay {
      sub_stage_id: sub_stage_id.to_string(),
      status,
    };
    {
      let mut cache = self.cache.write().unwrap();
      if let Some(state) = cache.get_mut(project_id) {
        state.sub_stage_progress = effective_progress(&state.sub_stage_progress, Some(&overlay));
      }
    }

    let written = self
      .store
      .write_sub_stage_progress(project_id, sub_stage_id, status)
      .await;

    // Whether the write landed or not, the overlaid cache entry is stale.
    self.clear_cache(Some(project_id));
    written?;

    info!(
      project_id = %project_id,
      sub_stage_id = %sub_stage_id,
      status = ?status,
      "sub_stage_progress_updated"
    );
    self.emit(
      project_id,
      WorkflowEventKind::SubStageUpdated,
      format!("Sub-stage '{}' moved to {:?}", sub_stage_id, status),
      serde_json::Value::Null,
    );

    Ok(self.load_workflow_state(project_id).await.ok())
  }

  /// Decide a batch of approvals concurrently. Items fail independently;
  /// the batch reports partial success instead of failing as a whole.
  #[instrument(name = "decide_approvals", skip(self, approval_ids), fields(project_id = %project_id))]
  pub async fn decide_approvals(
    &self,
    project_id: &str,
    approval_ids: &[String],
    decision: ApprovalStatus,
    reason: Option<&str>,
  ) -> BulkDecisionOutcome {
    let writes = approval_ids.iter().map(|approval_id| async move {
      let result = self
        .store
        .write_approval_decision(approval_id, decision, reason)
        .await;
      (approval_id.clone(), result)
    });
    let results = futures::future::join_all(writes).await;

    let mut outcome = BulkDecisionOutcome {
      succeeded: 0,
      failed: 0,
      failures: Vec::new(),
    };
    for (approval_id, result) in results {
      match result {
        Ok(()) => {
          outcome.succeeded += 1;
          self.emit(
            project_id,
            WorkflowEventKind::ApprovalDecided,
            format!("Approval '{}' {:?}", approval_id, decision),
            serde_json::Value::Null,
          );
        }
        Err(e) => {
          warn!(approval_id = %approval_id, error = %e, "approval_decision_failed");
          outcome.failed += 1;
          outcome.failures.push((approval_id, e.to_string()));
        }
      }
    }

    if outcome.succeeded > 0 {
      self.clear_cache(Some(project_id));
    }

    info!(
      project_id = %project_id,
      succeeded = outcome.succeeded,
      failed = outcome.failed,
      "approvals_decided"
    );
    outcome
  }

  /// Drop cached state for one project, or for all projects.
  pub fn clear_cache(&self, project_id: Option<&str>) {
    let mut cache = self.cache.write().unwrap();
    match project_id {
      Some(id) => {
        cache.remove(id);
      }
      None => cache.clear(),
    }
  }

  /// Invalidate and reload a project's state.
  pub async fn refresh_workflow_state(
    &self,
    project_id: &str,
  ) -> Result<ProjectWorkflowState, SessionError> {
    self.clear_cache(Some(project_id));
    self.load_workflow_state(project_id).await
  }

  /// Queue an audit event. Fire-and-forget; never blocks, never fails.
  pub fn log_workflow_event(&self, event: WorkflowEvent) {
    self.audit.log(event);
  }

  /// Read a project's audit trail, oldest first.
  pub async fn workflow_history(
    &self,
    project_id: &str,
  ) -> Result<Vec<WorkflowEvent>, SessionError> {
    Ok(self.store.fetch_audit_events(project_id).await?)
  }

  /// The project loaded through this session's store, without assembling the
  /// full workflow view.
  pub async fn project(&self, project_id: &str) -> Result<Project, SessionError> {
    Ok(self.store.fetch_project(project_id).await?)
  }

  fn emit(
    &self,
    project_id: &str,
    kind: WorkflowEventKind,
    description: String,
    metadata: serde_json::Value,
  ) {
    self.audit.log(WorkflowEvent {
      event_id: uuid::Uuid::new_v4().to_string(),
      project_id: project_id.to_string(),
      kind,
      description,
      actor_id: None,
      metadata,
      created_at: Utc::now(),
    });
  }

  /// Close the audit channel and wait for queued events to be flushed.
  pub async fn shutdown(self) {
    let WorkflowSession { audit, drain, .. } = self;
    drop(audit);
    let _ = drain.await;
  }
}
