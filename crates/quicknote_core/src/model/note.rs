//! Note domain model.
//!
//! # Responsibility
//! - Define the note record persisted by the store and rendered by the UI.
//! - Own the blank-field validation rules applied before every write.
//! - Provide the default color palette and the note timestamp source.
//!
//! # Invariants
//! - `id == None` means the note has never been persisted.
//! - `title` and `content` are both non-blank for every successfully added note.
//! - `next_timestamp()` is strictly increasing within one process.

use crate::config::{CONTENT_REQUIRED_MESSAGE, TITLE_REQUIRED_MESSAGE};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned integer identity of a persisted note.
pub type NoteId = i64;

pub const RED_ORANGE: u32 = 0xFFFF_AB91;
pub const LIGHT_GREEN: u32 = 0xFFE7_ED9B;
pub const VIOLET: u32 = 0xFFCF_94DA;
pub const BABY_BLUE: u32 = 0xFF81_DEEA;
pub const RED_PINK: u32 = 0xFFF4_8FB1;

/// Packed ARGB colors a note can be painted with.
pub const NOTE_COLORS: [u32; 5] = [RED_ORANGE, LIGHT_GREEN, VIOLET, BABY_BLUE, RED_PINK];

static LAST_TIMESTAMP: AtomicI64 = AtomicI64::new(0);

/// One short text note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// `None` until the store assigns an id on first insert.
    pub id: Option<NoteId>,
    pub title: String,
    pub content: String,
    /// Creation/modification instant in epoch milliseconds.
    pub timestamp: i64,
    /// Packed ARGB color.
    pub color: u32,
}

/// Validation failure for note writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Title is empty or whitespace-only.
    BlankTitle,
    /// Content is empty or whitespace-only.
    BlankContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => f.write_str(TITLE_REQUIRED_MESSAGE),
            Self::BlankContent => f.write_str(CONTENT_REQUIRED_MESSAGE),
        }
    }
}

impl Error for NoteValidationError {}

impl Note {
    /// Creates an unsaved note.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
        color: u32,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            timestamp,
            color,
        }
    }

    /// Returns a copy of this note carrying the given id.
    pub fn with_id(mut self, id: NoteId) -> Self {
        self.id = Some(id);
        self
    }

    /// Validates the fields required for a write.
    ///
    /// # Errors
    /// - `BlankTitle` when the title is blank, regardless of content.
    /// - `BlankContent` when the title is set but the content is blank.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if is_blank(&self.title) {
            return Err(NoteValidationError::BlankTitle);
        }
        if is_blank(&self.content) {
            return Err(NoteValidationError::BlankContent);
        }
        Ok(())
    }
}

/// Returns whether `value` is empty or whitespace-only.
pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Returns the current epoch-millisecond timestamp for a note write.
///
/// Two calls in the same process never return the same value, even when the
/// wall clock stalls or steps backwards.
pub fn next_timestamp() -> i64 {
    let wall = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0);

    let mut last = LAST_TIMESTAMP.load(Ordering::Relaxed);
    loop {
        let candidate = wall.max(last.saturating_add(1));
        match LAST_TIMESTAMP.compare_exchange_weak(
            last,
            candidate,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => return candidate,
            Err(observed) => last = observed,
        }
    }
}
