//! Stagegate Workflow
//!
//! Pure stage-order logic: where a candidate stage sits relative to the
//! project's current stage, which stage comes next, and which stages the
//! project may move to. No I/O - everything here is a function of the stage
//! list and the current position.

mod flags;
mod position;

pub use flags::{StageFlag, next_stage, stage_flags};
pub use position::StagePosition;
