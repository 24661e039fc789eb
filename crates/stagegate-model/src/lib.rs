//! Stagegate Model
//!
//! Domain types shared by every stagegate crate. A [`Project`] moves through
//! an ordered pipeline of [`WorkflowStage`]s; each stage owns required and
//! optional [`WorkflowSubStage`]s whose per-project state is tracked by
//! [`SubStageProgress`]. [`Approval`]s and document requirements gate
//! advancement out of a stage.
//!
//! These types carry no behavior beyond local invariants (status transition
//! legality, terminality checks). Validation and orchestration live in
//! `stagegate-validate` and `stagegate-session`.

mod approval;
mod document;
mod event;
mod progress;
mod project;
mod stage;

pub use approval::{Approval, ApprovalEntityType, ApprovalStatus};
pub use document::{Document, DocumentRequirement, DocumentStatus};
pub use event::{WorkflowEvent, WorkflowEventKind};
pub use progress::{SubStageProgress, SubStageStatus};
pub use project::{Project, ProjectStatus};
pub use stage::{WorkflowStage, WorkflowSubStage};
