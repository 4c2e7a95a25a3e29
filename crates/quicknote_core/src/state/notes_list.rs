//! Note list screen state.
//!
//! # Responsibility
//! - Keep the sorted note list in sync with the store.
//! - Re-subscribe the query when the order changes.
//! - Hold the single-slot undo buffer for the last deleted note.
//!
//! # Invariants
//! - At most one query subscription is live; the previous one is cancelled
//!   before the next starts, and its late emissions are discarded.
//! - The undo buffer holds at most one note; each delete that removed a stored
//!   note overwrites it and a successful restore clears it. Restore therefore
//!   only ever re-adds a note the store actually held.

use crate::config::DEFAULT_NOTE_ORDER;
use crate::model::note::Note;
use crate::model::order::NoteOrder;
use crate::service::note_use_cases::{NoteUseCases, UseCaseError};
use futures::StreamExt;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Rendered state of the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesState {
    pub notes: Vec<Note>,
    pub order: NoteOrder,
    pub is_order_section_visible: bool,
}

impl Default for NotesState {
    fn default() -> Self {
        Self {
            notes: Vec::new(),
            order: DEFAULT_NOTE_ORDER,
            is_order_section_visible: false,
        }
    }
}

/// User intents on the note list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesEvent {
    /// Re-sort the list; ignored when equal to the current order.
    Order(NoteOrder),
    /// Delete a note and remember it for one restore.
    DeleteNote(Note),
    /// Re-add the last deleted note, if any.
    RestoreNote,
    /// Show or hide the order picker.
    ToggleOrderSection,
}

struct Subscription {
    order: NoteOrder,
    token: CancellationToken,
    worker: JoinHandle<()>,
}

impl Subscription {
    fn cancel(self) {
        self.token.cancel();
        self.worker.abort();
    }
}

/// State holder for the note list screen.
pub struct NotesListModel {
    use_cases: NoteUseCases,
    state: Arc<watch::Sender<NotesState>>,
    subscription: Option<Subscription>,
    recently_deleted: Option<Note>,
}

impl NotesListModel {
    /// Creates the model and subscribes with the default order.
    pub fn new(use_cases: NoteUseCases) -> Self {
        Self::with_order(use_cases, DEFAULT_NOTE_ORDER)
    }

    /// Creates the model and subscribes with `order`.
    pub fn with_order(use_cases: NoteUseCases, order: NoteOrder) -> Self {
        let (state, _) = watch::channel(NotesState {
            order,
            ..NotesState::default()
        });
        let mut model = Self {
            use_cases,
            state: Arc::new(state),
            subscription: None,
            recently_deleted: None,
        };
        model.subscribe(order);
        model
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> NotesState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<NotesState> {
        self.state.subscribe()
    }

    /// Returns the note a `RestoreNote` would bring back.
    pub fn recently_deleted(&self) -> Option<&Note> {
        self.recently_deleted.as_ref()
    }

    /// Applies one user intent.
    ///
    /// # Errors
    /// Store failures from delete/restore are returned; the undo buffer is
    /// left as it was.
    pub async fn on_event(&mut self, event: NotesEvent) -> Result<(), UseCaseError> {
        match event {
            NotesEvent::Order(order) => {
                if self.requested_order() == Some(order) {
                    debug!("event=notes_order module=state status=skipped order={order}");
                    return Ok(());
                }
                self.subscribe(order);
            }
            NotesEvent::DeleteNote(note) => {
                if self.use_cases.delete_note.invoke(&note).await? {
                    self.recently_deleted = Some(note);
                } else {
                    debug!("event=notes_delete module=state status=skipped reason=not_stored");
                }
            }
            NotesEvent::RestoreNote => {
                let Some(note) = self.recently_deleted.clone() else {
                    debug!("event=notes_restore module=state status=skipped reason=empty_buffer");
                    return Ok(());
                };
                self.use_cases.add_note.invoke(&note).await?;
                self.recently_deleted = None;
            }
            NotesEvent::ToggleOrderSection => {
                self.state.send_modify(|state| {
                    state.is_order_section_visible = !state.is_order_section_visible;
                });
            }
        }
        Ok(())
    }

    /// Cancels the live subscription and waits for its worker to stop.
    pub async fn close(mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.token.cancel();
            let _ = subscription.worker.await;
        }
    }

    fn requested_order(&self) -> Option<NoteOrder> {
        self.subscription.as_ref().map(|subscription| subscription.order)
    }

    fn subscribe(&mut self, order: NoteOrder) {
        if let Some(previous) = self.subscription.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        let mut notes = self.use_cases.get_notes.invoke(order);
        let state = Arc::clone(&self.state);
        let worker_token = token.clone();
        let worker = tokio::spawn(async move {
            loop {
                let snapshot = tokio::select! {
                    biased;
                    () = worker_token.cancelled() => break,
                    next = notes.next() => match next {
                        Some(snapshot) => snapshot,
                        None => break,
                    },
                };
                // Checked under the watch lock so a cancelled query cannot
                // land after the one that replaced it.
                state.send_if_modified(|current| {
                    if worker_token.is_cancelled() {
                        return false;
                    }
                    current.notes = snapshot;
                    current.order = order;
                    true
                });
            }
            debug!("event=notes_query module=state status=stopped order={order}");
        });

        info!("event=notes_query module=state status=start order={order}");
        self.subscription = Some(Subscription {
            order,
            token,
            worker,
        });
    }
}

impl Drop for NotesListModel {
    fn drop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}
