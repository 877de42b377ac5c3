//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate blob store calls into use-case level APIs.
//! - Keep the CLI decoupled from storage details and JSON layouts.

pub mod account_service;
pub mod session_service;
pub mod snapshot;
