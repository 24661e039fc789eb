//! Stagegate Validate
//!
//! The exit-criteria pipeline that decides whether a project may leave its
//! current stage.
//!
//! # Architecture
//!
//! ```text
//! CompositeExitCriteriaValidator
//! └── validate(store, project, stage, progress) -> ExitCriteriaResult
//!     ├── ProjectStatus          - project is active, titled, has a customer
//!     ├── SubStageCompletion     - required sub-stages are completed
//!     ├── DocumentRequirements   - required document categories have approved uploads
//!     └── ApprovalRequirements   - no pending approvals anywhere on the project
//! ```
//!
//! Each check is a variant of [`ExitCriteriaCheck`] mapping to one function;
//! adding a rule means adding a variant. Checks are idempotent, side-effect
//! free, and never fail past their boundary: a store read failure degrades to
//! a single generic blocking error so the rest of the pipeline still runs and
//! reports.

mod checks;
mod composite;
mod result;

pub use checks::{ExitCriteriaCheck, entry_criteria, project_preconditions};
pub use composite::CompositeExitCriteriaValidator;
pub use result::{ExitCriteriaResult, WorkflowValidation};
