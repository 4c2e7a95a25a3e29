//! Note mutation and lookup use-cases.
//!
//! # Responsibility
//! - Validate notes before insert-or-replace.
//! - Forward deletes and point lookups to the store.
//! - Bundle every note use-case for state models.
//!
//! # Invariants
//! - A note failing validation never reaches the store.
//! - Store errors are returned unchanged; nothing here retries.

use crate::model::note::{Note, NoteId, NoteValidationError};
use crate::repo::note_repo::{RepoError, RepoResult, SharedNoteRepository};
use crate::service::get_notes::GetNotes;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of a note use-case.
#[derive(Debug)]
pub enum UseCaseError {
    /// The note was rejected before reaching the store.
    Validation(NoteValidationError),
    /// The store failed the request.
    Store(RepoError),
}

impl Display for UseCaseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UseCaseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
        }
    }
}

impl From<NoteValidationError> for UseCaseError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for UseCaseError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

/// Validates and persists one note.
#[derive(Clone)]
pub struct AddNote {
    repo: SharedNoteRepository,
}

impl AddNote {
    pub fn new(repo: SharedNoteRepository) -> Self {
        Self { repo }
    }

    /// Inserts `note`, or replaces the stored note with the same id.
    ///
    /// # Errors
    /// - `Validation(BlankTitle)` when the title is blank.
    /// - `Validation(BlankContent)` when the title is set and content is blank.
    /// - `Store` when the store rejects the write.
    pub async fn invoke(&self, note: &Note) -> Result<NoteId, UseCaseError> {
        if let Err(err) = note.validate() {
            debug!("event=note_add module=service status=rejected reason={err:?}");
            return Err(err.into());
        }

        let id = self.repo.insert_or_replace(note).await?;
        info!(
            "event=note_add module=service status=ok note_id={id} replaced={}",
            note.id.is_some()
        );
        Ok(id)
    }
}

/// Removes one note.
#[derive(Clone)]
pub struct DeleteNote {
    repo: SharedNoteRepository,
}

impl DeleteNote {
    pub fn new(repo: SharedNoteRepository) -> Self {
        Self { repo }
    }

    /// Returns whether the store held the note.
    pub async fn invoke(&self, note: &Note) -> RepoResult<bool> {
        let removed = self.repo.delete_note(note).await?;
        info!(
            "event=note_delete module=service status=ok note_id={} removed={removed}",
            note.id.map_or_else(|| "none".to_string(), |id| id.to_string())
        );
        Ok(removed)
    }
}

/// Looks up one note; absence is `Ok(None)`.
#[derive(Clone)]
pub struct GetNoteById {
    repo: SharedNoteRepository,
}

impl GetNoteById {
    pub fn new(repo: SharedNoteRepository) -> Self {
        Self { repo }
    }

    pub async fn invoke(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.repo.get_note_by_id(id).await
    }
}

/// Every note use-case over one shared store.
#[derive(Clone)]
pub struct NoteUseCases {
    pub get_notes: GetNotes,
    pub add_note: AddNote,
    pub delete_note: DeleteNote,
    pub get_note: GetNoteById,
}

impl NoteUseCases {
    pub fn new(repo: SharedNoteRepository) -> Self {
        Self {
            get_notes: GetNotes::new(repo.clone()),
            add_note: AddNote::new(repo.clone()),
            delete_note: DeleteNote::new(repo.clone()),
            get_note: GetNoteById::new(repo),
        }
    }
}
