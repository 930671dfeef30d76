//! Persistence contracts and implementations.
//!
//! # Responsibility
//! - Define the blob-level record store used by services.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Repository APIs surface transport errors only; corrupt content is
//!   recovered at the load boundary.

pub mod record_store;
