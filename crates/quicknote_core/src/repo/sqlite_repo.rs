//! SQLite-backed note store.
//!
//! # Responsibility
//! - Map the `note` table onto the note store contract.
//! - Keep blocking SQLite work off the async executor.
//! - Publish a fresh snapshot after each successful write.
//!
//! # Invariants
//! - Every statement runs on a blocking worker while holding the connection
//!   lock; publish happens before the lock is released.
//! - A write and the snapshot that describes it commit together; subscribers
//!   only ever see committed collections, and a failed snapshot rolls the
//!   write back.
//! - Snapshots are ordered by `id` ascending.
//! - `AUTOINCREMENT` guarantees deleted ids are never reused.

use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{Note, NoteId};
use crate::repo::note_repo::{NoteRepository, NoteStream, RepoError, RepoResult};
use crate::repo::snapshot_hub::SnapshotHub;
use async_trait::async_trait;
use futures::StreamExt;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokio::task;

const NOTE_SELECT_SQL: &str = "SELECT id, title, content, timestamp, color FROM note";

struct Shared {
    conn: Mutex<Connection>,
    hub: SnapshotHub,
}

/// Note store over one migrated SQLite connection.
#[derive(Clone)]
pub struct SqliteNoteRepository {
    shared: Arc<Shared>,
}

impl SqliteNoteRepository {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self {
            shared: Arc::new(Shared {
                conn: Mutex::new(conn),
                hub: SnapshotHub::new(),
            }),
        }
    }

    /// Opens and migrates the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens and migrates a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }

    async fn run<T, F>(&self, op: &'static str, work: F) -> RepoResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &SnapshotHub) -> RepoResult<T> + Send + 'static,
    {
        let shared = Arc::clone(&self.shared);
        let result = task::spawn_blocking(move || {
            let conn = shared
                .conn
                .lock()
                .map_err(|_| RepoError::Unavailable("note connection lock poisoned".to_string()))?;
            work(&conn, &shared.hub)
        })
        .await
        .map_err(|err| RepoError::Unavailable(format!("note store worker failed: {err}")))?;

        if let Err(err) = &result {
            error!("event={op} module=repo store=sqlite status=error error={err}");
        }
        result
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    fn observe_all(&self) -> NoteStream {
        let shared = Arc::clone(&self.shared);
        let subscribe = async move {
            let seeded = task::spawn_blocking(move || -> RepoResult<NoteStream> {
                let conn = shared.conn.lock().map_err(|_| {
                    RepoError::Unavailable("note connection lock poisoned".to_string())
                })?;
                let current = select_all(&conn)?;
                Ok(shared.hub.subscribe(current))
            })
            .await;

            match seeded {
                Ok(Ok(stream)) => stream,
                Ok(Err(err)) => {
                    error!("event=note_observe module=repo store=sqlite status=error error={err}");
                    futures::stream::empty().boxed()
                }
                Err(err) => {
                    error!(
                        "event=note_observe module=repo store=sqlite status=error error=worker_failed:{err}"
                    );
                    futures::stream::empty().boxed()
                }
            }
        };
        futures::stream::once(subscribe).flatten().boxed()
    }

    async fn get_note_by_id(&self, id: NoteId) -> RepoResult<Option<Note>> {
        self.run("note_get", move |conn, _| {
            let note = conn
                .query_row(
                    &format!("{NOTE_SELECT_SQL} WHERE id = ?1;"),
                    [id],
                    map_note_row,
                )
                .optional()?;
            Ok(note)
        })
        .await
    }

    async fn insert_or_replace(&self, note: &Note) -> RepoResult<NoteId> {
        let note = note.clone();
        self.run("note_upsert", move |conn, hub| {
            let id = write_then_publish(conn, hub, |tx| {
                let id = match note.id {
                    Some(id) => {
                        tx.execute(
                            "INSERT OR REPLACE INTO note (id, title, content, timestamp, color)
                             VALUES (?1, ?2, ?3, ?4, ?5);",
                            params![id, note.title, note.content, note.timestamp, note.color],
                        )?;
                        id
                    }
                    None => {
                        tx.execute(
                            "INSERT INTO note (title, content, timestamp, color)
                             VALUES (?1, ?2, ?3, ?4);",
                            params![note.title, note.content, note.timestamp, note.color],
                        )?;
                        tx.last_insert_rowid()
                    }
                };
                Ok((id, true))
            })?;
            debug!("event=note_upsert module=repo store=sqlite status=ok note_id={id}");
            Ok(id)
        })
        .await
    }

    async fn delete_note(&self, note: &Note) -> RepoResult<bool> {
        let Some(id) = note.id else {
            debug!("event=note_delete module=repo store=sqlite status=skipped reason=unsaved");
            return Ok(false);
        };

        self.run("note_delete", move |conn, hub| {
            let removed = write_then_publish(conn, hub, |tx| {
                let removed = tx.execute("DELETE FROM note WHERE id = ?1;", [id])? > 0;
                Ok((removed, removed))
            })?;
            debug!(
                "event=note_delete module=repo store=sqlite status=ok note_id={id} removed={removed}"
            );
            Ok(removed)
        })
        .await
    }
}

/// Runs `write` and, when it reports a change, re-reads the collection in the
/// same transaction. Publishes only after commit.
fn write_then_publish<T>(
    conn: &Connection,
    hub: &SnapshotHub,
    write: impl FnOnce(&Connection) -> RepoResult<(T, bool)>,
) -> RepoResult<T> {
    let tx = conn.unchecked_transaction()?;
    let (value, changed) = write(&*tx)?;
    let snapshot = if changed {
        Some(select_all(&tx)?)
    } else {
        None
    };
    tx.commit()?;

    if let Some(snapshot) = snapshot {
        hub.publish(&snapshot);
    }
    Ok(value)
}

fn select_all(conn: &Connection) -> RepoResult<Vec<Note>> {
    let mut stmt = conn.prepare_cached(&format!("{NOTE_SELECT_SQL} ORDER BY id ASC;"))?;
    let notes = stmt
        .query_map([], map_note_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(notes)
}

fn map_note_row(row: &Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: Some(row.get("id")?),
        title: row.get("title")?,
        content: row.get("content")?,
        timestamp: row.get("timestamp")?,
        color: row.get("color")?,
    })
}
