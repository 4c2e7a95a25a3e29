use async_trait::async_trait;
use futures::StreamExt;
use quicknote_core::{
    InMemoryNoteRepository, Note, NoteId, NoteRepository, NoteStream, NoteUseCases,
    NoteValidationError, RepoError, RepoResult, UseCaseError, NOTE_COLORS,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Store that rejects every write and counts attempts.
#[derive(Default)]
struct BrokenStore {
    writes: AtomicUsize,
}

#[async_trait]
impl NoteRepository for BrokenStore {
    fn observe_all(&self) -> NoteStream {
        futures::stream::once(async { Vec::new() }).boxed()
    }

    async fn get_note_by_id(&self, _id: NoteId) -> RepoResult<Option<Note>> {
        Err(RepoError::Unavailable("disk on fire".to_string()))
    }

    async fn insert_or_replace(&self, _note: &Note) -> RepoResult<NoteId> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(RepoError::Unavailable("disk on fire".to_string()))
    }

    async fn delete_note(&self, _note: &Note) -> RepoResult<bool> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        Err(RepoError::Unavailable("disk on fire".to_string()))
    }
}

fn memory_use_cases() -> (Arc<InMemoryNoteRepository>, NoteUseCases) {
    let repo = Arc::new(InMemoryNoteRepository::new());
    let use_cases = NoteUseCases::new(repo.clone());
    (repo, use_cases)
}

#[tokio::test]
async fn add_rejects_empty_title_and_store_stays_empty() {
    let (repo, use_cases) = memory_use_cases();

    let err = use_cases
        .add_note
        .invoke(&Note::new("", "x", 1, NOTE_COLORS[0]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UseCaseError::Validation(NoteValidationError::BlankTitle)
    ));
    assert_eq!(err.to_string(), "title required");
    assert!(repo.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_whitespace_title_even_with_blank_content() {
    let (repo, use_cases) = memory_use_cases();

    let err = use_cases
        .add_note
        .invoke(&Note::new(" \t", "", 1, NOTE_COLORS[0]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UseCaseError::Validation(NoteValidationError::BlankTitle)
    ));
    assert!(repo.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_blank_content_when_title_is_set() {
    let (repo, use_cases) = memory_use_cases();

    let err = use_cases
        .add_note
        .invoke(&Note::new("title", "   ", 1, NOTE_COLORS[0]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        UseCaseError::Validation(NoteValidationError::BlankContent)
    ));
    assert_eq!(err.to_string(), "content required");
    assert!(repo.snapshot().unwrap().is_empty());
}

#[tokio::test]
async fn validation_happens_before_any_store_call() {
    let store = Arc::new(BrokenStore::default());
    let use_cases = NoteUseCases::new(store.clone());

    let err = use_cases
        .add_note
        .invoke(&Note::new("", "", 1, 0))
        .await
        .unwrap_err();

    assert!(matches!(err, UseCaseError::Validation(_)));
    assert_eq!(store.writes.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn add_assigns_id_and_replace_keeps_it() {
    let (repo, use_cases) = memory_use_cases();

    let id = use_cases
        .add_note
        .invoke(&Note::new("first", "body", 1, NOTE_COLORS[2]))
        .await
        .unwrap();

    let mut edited = use_cases.get_note.invoke(id).await.unwrap().unwrap();
    edited.title = "renamed".to_string();
    let replaced_id = use_cases.add_note.invoke(&edited).await.unwrap();

    assert_eq!(replaced_id, id);
    let stored = repo.snapshot().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "renamed");
}

#[tokio::test]
async fn get_note_by_id_returns_none_for_unknown_id() {
    let (_repo, use_cases) = memory_use_cases();
    assert_eq!(use_cases.get_note.invoke(404).await.unwrap(), None);
}

#[tokio::test]
async fn delete_removes_only_the_matching_note() {
    let repo = Arc::new(InMemoryNoteRepository::with_notes([
        Note::new("keep", "x", 1, 0),
        Note::new("drop", "x", 2, 0),
    ]));
    let use_cases = NoteUseCases::new(repo.clone());

    let target = repo.snapshot().unwrap()[1].clone();
    assert!(use_cases.delete_note.invoke(&target).await.unwrap());
    assert!(!use_cases.delete_note.invoke(&target).await.unwrap());

    let stored = repo.snapshot().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "keep");
}

#[tokio::test]
async fn store_failures_are_propagated_unchanged() {
    let use_cases = NoteUseCases::new(Arc::new(BrokenStore::default()));

    let add_err = use_cases
        .add_note
        .invoke(&Note::new("t", "c", 1, 0))
        .await
        .unwrap_err();
    assert!(matches!(add_err, UseCaseError::Store(RepoError::Unavailable(_))));

    let delete_err = use_cases
        .delete_note
        .invoke(&Note::new("t", "c", 1, 0).with_id(1))
        .await
        .unwrap_err();
    assert!(matches!(delete_err, RepoError::Unavailable(_)));

    let get_err = use_cases.get_note.invoke(1).await.unwrap_err();
    assert!(get_err.to_string().contains("disk on fire"));
}
