//! Scheduling computations over the workshop hierarchy.
//!
//! # Responsibility
//! - Compute due dates and status categories for tasks.
//! - Aggregate tasks needing attention and annotate completion history.
//!
//! # Invariants
//! - Every function here is pure; "today" is always a parameter.

pub mod compliance;
pub mod status;
pub mod upcoming;
