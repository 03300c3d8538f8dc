//! Intern record domain model and validation policy.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep write-time rules pure and independent of storage.
//!
//! # Invariants
//! - Every record is identified by a stable `InternId`.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod intern;
pub mod validation;
