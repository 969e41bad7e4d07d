//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep request boundaries decoupled from storage details.

pub mod account_service;
pub mod memo_service;
