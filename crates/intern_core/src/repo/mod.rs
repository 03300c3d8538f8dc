//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts.
//! - Isolate blob encoding and store access from service orchestration.
//!
//! # Invariants
//! - Repository writes must pass the validation policy before persistence.
//! - Repository APIs return semantic errors (`NotFound`, `CorruptData`) in
//!   addition to storage transport errors.

pub mod intern_repo;
