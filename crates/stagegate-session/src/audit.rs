//! Fire-and-forget audit logging.
//!
//! Events go out through an unbounded channel drained by a spawned task.
//! An append failure is logged and dropped; it never reaches the operation
//! that produced the event.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use stagegate_model::WorkflowEvent;
use stagegate_store::WorkflowStore;

/// Sender half of the audit pipeline.
#[derive(Clone)]
pub struct AuditLogger {
  sender: mpsc::UnboundedSender<WorkflowEvent>,
}

impl AuditLogger {
  /// Spawn the drain task and return the logger plus its join handle.
  ///
  /// The task ends when every `AuditLogger` clone has been dropped.
  pub fn spawn(store: Arc<dyn WorkflowStore>) -> (Self, JoinHandle<()>) {
    let (sender, mut receiver) = mpsc::unbounded_channel::<WorkflowEvent>();

    let handle = tokio::spawn(async move {
      while let Some(event) = receiver.recv().await {
        if let Err(e) = store.append_audit_event(&event).await {
          warn!(
            project_id = %event.project_id,
            error = %e,
            "failed to append audit event"
          );
        }
      }
    });

    (Self { sender }, handle)
  }

  /// Queue an event. Never blocks and never fails the caller.
  pub fn log(&self, event: WorkflowEvent) {
    if self.sender.send(event).is_err() {
      debug!("audit drain task gone, event dropped");
    }
  }
}
