//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate generator and repository calls into journal use-cases.
//! - Keep front ends decoupled from storage and generation details.

pub mod entry_service;
