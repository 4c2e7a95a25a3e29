//! Note use-cases.
//!
//! # Responsibility
//! - Turn store access into the query and mutation entry points the state
//!   models call.
//! - Enforce note validation before any write reaches the store.
//!
//! # Invariants
//! - Use-cases never mutate collections directly; every change goes through
//!   the store contract.

pub mod get_notes;
pub mod note_use_cases;
