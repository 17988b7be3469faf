//! Per-client questionnaire resolution.
//!
//! # Responsibility
//! - Merge global section/question definitions with per-client override
//!   patches into the effective form to present.
//!
//! # Invariants
//! - Resolution is pure and recomputed per read; no merged copy is cached
//!   or persisted, so global edits are never served stale.

mod resolve;

pub use resolve::{resolve_questions, resolve_sections};
