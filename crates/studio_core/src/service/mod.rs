//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parse/resolve passes and repository calls into use-case
//!   level APIs.
//! - Keep caller layers decoupled from storage details.

pub mod journal_service;
pub mod questionnaire_service;
