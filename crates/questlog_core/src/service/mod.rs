//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate ledger, engines and persistence into intent-level APIs.
//! - Keep UI/FFI layers free of business rules and storage details.

pub mod tracker_service;
