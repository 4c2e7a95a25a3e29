//! Domain model for notes and list ordering.
//!
//! # Responsibility
//! - Define the canonical `Note` value shared by store, use-cases and state.
//! - Define the closed `NoteOrder` selector used by the query pipeline.
//!
//! # Invariants
//! - A persisted note keeps one stable, never-reused `NoteId`.
//! - Orders are values; changing a direction yields a new `NoteOrder`.

pub mod note;
pub mod order;
