//! Sorted live note query.
//!
//! # Invariants
//! - Every snapshot from the store is re-sorted from scratch.
//! - Descending is the exact reverse of the ascending comparator; the sort is
//!   stable, so ties keep store order in both directions.

use crate::model::note::Note;
use crate::model::order::{NoteOrder, OrderDirection};
use crate::repo::note_repo::{NoteStream, SharedNoteRepository};
use futures::StreamExt;
use std::cmp::Reverse;

/// Live note list sorted by a `NoteOrder`.
#[derive(Clone)]
pub struct GetNotes {
    repo: SharedNoteRepository,
}

impl GetNotes {
    pub fn new(repo: SharedNoteRepository) -> Self {
        Self { repo }
    }

    /// Starts an independent sorted subscription to the store.
    pub fn invoke(&self, order: NoteOrder) -> NoteStream {
        self.repo
            .observe_all()
            .map(move |mut notes| {
                sort_notes(&mut notes, order);
                notes
            })
            .boxed()
    }
}

/// Sorts `notes` in place by `order`.
///
/// Title keys are case-folded once per note, not once per comparison.
pub fn sort_notes(notes: &mut [Note], order: NoteOrder) {
    use OrderDirection::{Ascending, Descending};

    match (order, order.direction()) {
        (NoteOrder::Title(_), Ascending) => notes.sort_by_cached_key(title_key),
        (NoteOrder::Title(_), Descending) => {
            notes.sort_by_cached_key(|note| Reverse(title_key(note)))
        }
        (NoteOrder::Date(_), Ascending) => notes.sort_by_key(|note| note.timestamp),
        (NoteOrder::Date(_), Descending) => notes.sort_by_key(|note| Reverse(note.timestamp)),
        (NoteOrder::Color(_), Ascending) => notes.sort_by_key(|note| note.color),
        (NoteOrder::Color(_), Descending) => notes.sort_by_key(|note| Reverse(note.color)),
    }
}

fn title_key(note: &Note) -> String {
    note.title.to_lowercase()
}
