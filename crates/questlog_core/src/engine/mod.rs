//! Pure gamification computations.
//!
//! Nothing in this module touches storage; the tracker service persists the
//! returned state.

pub mod achievements;
pub mod progression;
