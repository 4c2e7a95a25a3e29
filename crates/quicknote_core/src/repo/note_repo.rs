//! Note store contract.
//!
//! # Responsibility
//! - Describe the persistence boundary as a live snapshot stream plus point
//!   CRUD.
//! - Carry store-level failures to the caller untouched.
//!
//! # Invariants
//! - `observe_all` emits the current collection first, then one snapshot per
//!   insert and per delete that removed a row; it never skips a snapshot.
//! - `insert_or_replace` keeps an existing id and assigns one when absent.
//! - A missing note is `Ok(None)`, never an error.

use crate::db::DbError;
use crate::model::note::{Note, NoteId};
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

pub type RepoResult<T> = Result<T, RepoError>;

/// Live sequence of full note collections.
pub type NoteStream = BoxStream<'static, Vec<Note>>;

/// Repository handle shared by use-cases and state models.
pub type SharedNoteRepository = Arc<dyn NoteRepository>;

/// Store-level failure.
#[derive(Debug)]
pub enum RepoError {
    /// Database transport or constraint failure.
    Db(DbError),
    /// The store could not run the request (poisoned lock, worker failure).
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "note store unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Reactive note store.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Subscribes to the full collection; see module invariants.
    fn observe_all(&self) -> NoteStream;
    /// Loads one note by id.
    async fn get_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>>;
    /// Upserts `note` keyed by its id and returns the stored id.
    async fn insert_or_replace(&self, note: &Note) -> RepoResult<NoteId>;
    /// Removes the note with the same id and reports whether a row went
    /// away. Unsaved notes match nothing.
    async fn delete_note(&self, note: &Note) -> RepoResult<bool>;
}
