//! Note store port and its adapters.
//!
//! # Responsibility
//! - Define the reactive CRUD contract the use-cases consume.
//! - Provide in-memory and SQLite implementations of that contract.
//!
//! # Invariants
//! - Every write that changes the collection is followed by exactly one
//!   snapshot to each live subscriber.
//! - A new subscription always starts with the current full collection.

pub mod memory_repo;
pub mod note_repo;
pub mod snapshot_hub;
pub mod sqlite_repo;
