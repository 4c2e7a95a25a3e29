//! Core domain and state logic for quicknote.
//! This crate is the single source of truth for note invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod state;

pub use config::{ConfigError, CoreConfig, DEFAULT_NOTE_ORDER};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::note::{next_timestamp, Note, NoteId, NoteValidationError, NOTE_COLORS};
pub use model::order::{NoteOrder, OrderDirection};
pub use repo::memory_repo::InMemoryNoteRepository;
pub use repo::note_repo::{NoteRepository, NoteStream, RepoError, RepoResult, SharedNoteRepository};
pub use repo::sqlite_repo::SqliteNoteRepository;
pub use service::get_notes::{sort_notes, GetNotes};
pub use service::note_use_cases::{AddNote, DeleteNote, GetNoteById, NoteUseCases, UseCaseError};
pub use state::note_editor::{
    EditorUiEvent, NoteEditorEvent, NoteEditorModel, NoteEditorState, NoteTextFieldState,
};
pub use state::notes_list::{NotesEvent, NotesListModel, NotesState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
