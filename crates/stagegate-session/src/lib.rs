//! Stagegate Session
//!
//! The orchestration layer over a project's workflow view.
//!
//! # Architecture
//!
//! ```text
//! WorkflowSession
//! ├── new(store) - spawns the audit drain task
//! ├── load_workflow_state(project_id) -> ProjectWorkflowState
//! ├── advance_stage(project_id, target, reason) -> AdvanceOutcome
//! ├── update_project_status / update_sub_stage_progress
//! ├── decide_approvals(..) - concurrent fan-out, partial success reported
//! ├── clear_cache / refresh_workflow_state
//! ├── workflow_history(project_id)
//! └── shutdown() - closes the audit channel and waits for the drain task
//! ```
//!
//! The session is an explicit, passed-in object: callers construct one per
//! scope (request, test, CLI invocation) and hold a reference. There is no
//! ambient global. The per-project state cache has no TTL; it stays correct
//! because every mutating path invalidates it.

mod audit;
mod error;
mod overlay;
mod session;
mod state;

pub use audit::AuditLogger;
pub use error::SessionError;
pub use overlay::{PendingStatusOverlay, effective_progress};
pub use session::{AdvanceOutcome, BulkDecisionOutcome, WorkflowSession};
pub use state::{ProjectWorkflowState, SessionPhase};
