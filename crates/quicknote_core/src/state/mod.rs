//! Screen state models driven by user intents.
//!
//! # Responsibility
//! - Own per-screen state and expose it as a `watch` value.
//! - Translate intents into use-case calls and state transitions.
//!
//! # Invariants
//! - Models must be created inside a tokio runtime; background work is
//!   spawned on it and cancelled when the model is dropped.
//! - Models never mutate the note collection; they cache store snapshots.

pub mod note_editor;
pub mod notes_list;
