//! In-memory note store.
//!
//! # Responsibility
//! - Implement the note store contract without I/O, for tests and hosts that
//!   do not persist.
//!
//! # Invariants
//! - Ids are assigned from a counter that only grows, so deleted ids are
//!   never handed out again.
//! - Collection order is insertion order; replacing keeps the position.

use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, NoteStream, RepoError, RepoResult};
use crate::repo::snapshot_hub::SnapshotHub;
use async_trait::async_trait;
use futures::StreamExt;
use log::debug;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug)]
struct Table {
    notes: Vec<Note>,
    next_id: NoteId,
}

/// Note store backed by a `Vec` behind a mutex.
pub struct InMemoryNoteRepository {
    table: Mutex<Table>,
    hub: SnapshotHub,
}

impl Default for InMemoryNoteRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self {
            table: Mutex::new(Table {
                notes: Vec::new(),
                next_id: 1,
            }),
            hub: SnapshotHub::new(),
        }
    }

    /// Builds a store pre-filled with `notes`, assigning ids where missing.
    pub fn with_notes(notes: impl IntoIterator<Item = Note>) -> Self {
        let repo = Self::new();
        if let Ok(mut table) = repo.table.lock() {
            for note in notes {
                upsert(&mut table, note);
            }
        }
        repo
    }

    /// Returns the current collection without subscribing.
    pub fn snapshot(&self) -> RepoResult<Vec<Note>> {
        Ok(self.lock()?.notes.clone())
    }

    /// Number of live `observe_all` subscribers as of the last write.
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Table>> {
        self.table
            .lock()
            .map_err(|_| RepoError::Unavailable("in-memory note table lock poisoned".to_string()))
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    fn observe_all(&self) -> NoteStream {
        match self.lock() {
            Ok(table) => self.hub.subscribe(table.notes.clone()),
            // Poisoned only after a panic mid-write; nothing trustworthy to seed with.
            Err(_) => futures::stream::empty().boxed(),
        }
    }

    async fn get_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        let table = self.lock()?;
        Ok(table.notes.iter().find(|note| note.id == Some(id)).cloned())
    }

    async fn insert_or_replace(&self, note: &Note) -> RepoResult<NoteId> {
        let mut table = self.lock()?;
        let id = upsert(&mut table, note.clone());
        self.hub.publish(&table.notes);
        debug!("event=note_upsert module=repo store=memory status=ok note_id={id}");
        Ok(id)
    }

    async fn delete_note(&self, note: &Note) -> RepoResult<bool> {
        let Some(id) = note.id else {
            debug!("event=note_delete module=repo store=memory status=skipped reason=unsaved");
            return Ok(false);
        };

        let mut table = self.lock()?;
        let before = table.notes.len();
        table.notes.retain(|stored| stored.id != Some(id));
        let removed = table.notes.len() != before;
        if removed {
            self.hub.publish(&table.notes);
        }
        debug!(
            "event=note_delete module=repo store=memory status=ok note_id={id} removed={removed}"
        );
        Ok(removed)
    }
}

fn upsert(table: &mut Table, mut note: Note) -> NoteId {
    let id = match note.id {
        Some(id) => id,
        None => table.next_id,
    };
    table.next_id = table.next_id.max(id.saturating_add(1));
    note.id = Some(id);

    match table.notes.iter_mut().find(|stored| stored.id == Some(id)) {
        Some(stored) => *stored = note,
        None => table.notes.push(note),
    }
    id
}
