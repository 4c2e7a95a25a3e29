//! Note editor screen state.
//!
//! # Responsibility
//! - Hold the title/content fields, hint visibility and selected color.
//! - Load an existing note when editing.
//! - Save through `AddNote` and report the outcome as a one-shot UI event.
//!
//! # Invariants
//! - Validation failures become `ShowMessage` events, never errors.
//! - UI events reach at most one listener: subscribing again disconnects the
//!   previous receiver.
//! - UI events are not replayed: a receiver sees only events sent after it
//!   subscribed, and events sent with no receiver are dropped.

use crate::config::{CONTENT_HINT, TITLE_HINT};
use crate::model::note::{is_blank, next_timestamp, Note, NoteId, NOTE_COLORS, RED_ORANGE};
use crate::repo::note_repo::RepoResult;
use crate::service::note_use_cases::{NoteUseCases, UseCaseError};
use log::{debug, warn};
use rand::seq::IndexedRandom;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// One editable text field with a placeholder hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTextFieldState {
    pub text: String,
    pub hint: String,
    pub is_hint_visible: bool,
}

impl NoteTextFieldState {
    fn empty(hint: &str) -> Self {
        Self {
            text: String::new(),
            hint: hint.to_string(),
            is_hint_visible: true,
        }
    }

    fn loaded(&mut self, text: String) {
        self.text = text;
        self.is_hint_visible = false;
    }

    fn focus_changed(&mut self, is_focused: bool) {
        self.is_hint_visible = !is_focused && is_blank(&self.text);
    }
}

/// Rendered state of the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEditorState {
    pub title: NoteTextFieldState,
    pub content: NoteTextFieldState,
    pub color: u32,
    /// `None` while creating a new note.
    pub current_note_id: Option<NoteId>,
}

/// User intents on the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteEditorEvent {
    EnteredTitle(String),
    EnteredContent(String),
    ChangeTitleFocus(bool),
    ChangeContentFocus(bool),
    ChangeColor(u32),
    SaveNote,
}

/// One-shot notifications for the editor host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorUiEvent {
    /// Show a transient message, e.g. a validation failure.
    ShowMessage(String),
    /// The note was stored; the editor can close.
    NoteSaved,
}

/// State holder for the note editor screen.
pub struct NoteEditorModel {
    use_cases: NoteUseCases,
    state: Arc<watch::Sender<NoteEditorState>>,
    ui_events: Mutex<Option<UnboundedSender<EditorUiEvent>>>,
    loader: Option<(CancellationToken, JoinHandle<()>)>,
}

impl NoteEditorModel {
    /// Creates an editor for a new note with a random palette color.
    pub fn new(use_cases: NoteUseCases) -> Self {
        let color = NOTE_COLORS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or(RED_ORANGE);
        let (state, _) = watch::channel(NoteEditorState {
            title: NoteTextFieldState::empty(TITLE_HINT),
            content: NoteTextFieldState::empty(CONTENT_HINT),
            color,
            current_note_id: None,
        });
        Self {
            use_cases,
            state: Arc::new(state),
            ui_events: Mutex::new(None),
            loader: None,
        }
    }

    /// Creates an editor and starts loading note `note_id` into it.
    ///
    /// A missing note leaves the editor in "new note" state.
    pub fn edit(use_cases: NoteUseCases, note_id: NoteId) -> Self {
        let mut model = Self::new(use_cases);
        let token = CancellationToken::new();
        let worker_token = token.clone();
        let get_note = model.use_cases.get_note.clone();
        let state = Arc::clone(&model.state);

        let worker = tokio::spawn(async move {
            let loaded = tokio::select! {
                biased;
                () = worker_token.cancelled() => return,
                loaded = get_note.invoke(note_id) => loaded,
            };
            match loaded {
                Ok(Some(note)) => {
                    state.send_if_modified(|current| {
                        if worker_token.is_cancelled() {
                            return false;
                        }
                        current.title.loaded(note.title);
                        current.content.loaded(note.content);
                        current.color = note.color;
                        current.current_note_id = note.id;
                        true
                    });
                    debug!("event=editor_load module=state status=ok note_id={note_id}");
                }
                Ok(None) => {
                    debug!("event=editor_load module=state status=not_found note_id={note_id}");
                }
                Err(err) => {
                    warn!(
                        "event=editor_load module=state status=error note_id={note_id} error={err}"
                    );
                }
            }
        });

        model.loader = Some((token, worker));
        model
    }

    /// Returns a copy of the current state.
    pub fn state(&self) -> NoteEditorState {
        self.state.borrow().clone()
    }

    /// Returns a receiver notified on every state change.
    pub fn subscribe_state(&self) -> watch::Receiver<NoteEditorState> {
        self.state.subscribe()
    }

    /// Returns a receiver for UI events sent from now on, replacing any
    /// previous receiver.
    pub fn subscribe_events(&self) -> UnboundedReceiver<EditorUiEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self
            .ui_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(sender);
        receiver
    }

    /// Applies one user intent.
    ///
    /// # Errors
    /// Only store failures during `SaveNote`; validation failures are sent as
    /// `EditorUiEvent::ShowMessage`.
    pub async fn on_event(&mut self, event: NoteEditorEvent) -> RepoResult<()> {
        match event {
            NoteEditorEvent::EnteredTitle(text) => {
                self.state.send_modify(|state| state.title.text = text);
            }
            NoteEditorEvent::EnteredContent(text) => {
                self.state.send_modify(|state| state.content.text = text);
            }
            NoteEditorEvent::ChangeTitleFocus(is_focused) => {
                self.state
                    .send_modify(|state| state.title.focus_changed(is_focused));
            }
            NoteEditorEvent::ChangeContentFocus(is_focused) => {
                self.state
                    .send_modify(|state| state.content.focus_changed(is_focused));
            }
            NoteEditorEvent::ChangeColor(color) => {
                self.state.send_modify(|state| state.color = color);
            }
            NoteEditorEvent::SaveNote => return self.save().await,
        }
        Ok(())
    }

    async fn save(&self) -> RepoResult<()> {
        let note = {
            let state = self.state.borrow();
            Note {
                id: state.current_note_id,
                title: state.title.text.clone(),
                content: state.content.text.clone(),
                timestamp: next_timestamp(),
                color: state.color,
            }
        };

        match self.use_cases.add_note.invoke(&note).await {
            Ok(id) => {
                // A second save from the same editor replaces instead of duplicating.
                self.state
                    .send_modify(|state| state.current_note_id = Some(id));
                self.emit(EditorUiEvent::NoteSaved);
                Ok(())
            }
            Err(UseCaseError::Validation(err)) => {
                self.emit(EditorUiEvent::ShowMessage(err.to_string()));
                Ok(())
            }
            Err(UseCaseError::Store(err)) => Err(err),
        }
    }

    fn emit(&self, event: EditorUiEvent) {
        let mut listener = self
            .ui_events
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let delivered = match listener.as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        };
        if !delivered {
            *listener = None;
            debug!("event=editor_ui_event module=state status=dropped reason=no_listener");
        }
    }
}

impl Drop for NoteEditorModel {
    fn drop(&mut self) {
        if let Some((token, worker)) = self.loader.take() {
            token.cancel();
            worker.abort();
        }
    }
}
