//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate gate, ledger and record store into use-case level APIs.
//! - Keep presentation callers decoupled from storage details.

pub mod context;
pub mod maintenance_service;
