//! Domain model for tasks and gamification state.
//!
//! # Responsibility
//! - Define the records shared by ledger, engines and persistence.
//! - Hold the static achievement definitions.
//!
//! # Invariants
//! - Every task is identified by a unique `TaskId`.
//! - `ProgressionState::level` is derived from points, never set freely.

pub mod achievement;
pub mod progression;
pub mod task;
