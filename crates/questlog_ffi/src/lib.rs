//! Flutter-facing bindings for QuestLog core.

pub mod api;
