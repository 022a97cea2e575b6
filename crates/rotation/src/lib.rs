//! Chore rotation engine for Chorebot.
//!
//! The engine hands out chore weeks round-robin from a persisted cursor:
//! - [`RotationEngine::generate`]: a month's schedule, memoized per month
//! - [`RotationEngine::set_next_index`]: manual override of whose turn is next
//! - [`RotationEngine::reset`]: back to the first roommate
//! - [`RotationEngine::reassign_weeks`]: hand individual weeks to someone else
//!
//! State lives behind an injected [`chorebot_core::StateStore`]; the
//! best-effort persistence policy is in [`policy`].

pub mod engine;
pub mod error;
pub mod policy;

pub use engine::{
    Generation, MAX_PREVIEW_MONTHS, MonthPreview, Partitioner, RotationEngine, RotationStatus,
    ScheduleSource,
};
pub use error::RotationError;
pub use policy::BestEffortState;
