use futures::StreamExt;
use quicknote_core::{
    GetNotes, InMemoryNoteRepository, Note, NoteOrder, NoteRepository, OrderDirection,
};
use rand::seq::SliceRandom;
use std::sync::Arc;

const ALL_ORDERS: [NoteOrder; 6] = [
    NoteOrder::Title(OrderDirection::Ascending),
    NoteOrder::Title(OrderDirection::Descending),
    NoteOrder::Date(OrderDirection::Ascending),
    NoteOrder::Date(OrderDirection::Descending),
    NoteOrder::Color(OrderDirection::Ascending),
    NoteOrder::Color(OrderDirection::Descending),
];

fn alphabet_repo() -> Arc<InMemoryNoteRepository> {
    let mut notes: Vec<Note> = ('a'..='z')
        .enumerate()
        .map(|(index, letter)| {
            Note::new(
                letter.to_string(),
                letter.to_string(),
                index as i64,
                index as u32,
            )
        })
        .collect();
    notes.shuffle(&mut rand::rng());
    Arc::new(InMemoryNoteRepository::with_notes(notes))
}

fn titles(notes: &[Note]) -> Vec<&str> {
    notes.iter().map(|note| note.title.as_str()).collect()
}

#[tokio::test]
async fn every_order_sorts_adjacent_pairs() {
    let repo = alphabet_repo();
    let get_notes = GetNotes::new(repo);

    for order in ALL_ORDERS {
        let notes = get_notes.invoke(order).next().await.unwrap();
        assert_eq!(notes.len(), 26);
        for pair in notes.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            let ascending = match order {
                NoteOrder::Title(_) => a.title.to_lowercase() < b.title.to_lowercase(),
                NoteOrder::Date(_) => a.timestamp < b.timestamp,
                NoteOrder::Color(_) => a.color < b.color,
            };
            match order.direction() {
                OrderDirection::Ascending => assert!(ascending, "{order}: {a:?} !< {b:?}"),
                OrderDirection::Descending => assert!(!ascending, "{order}: {a:?} !> {b:?}"),
            }
        }
    }
}

#[tokio::test]
async fn title_scenario_sorts_both_directions() {
    let repo = Arc::new(InMemoryNoteRepository::with_notes([
        Note::new("b", "x", 1, 0),
        Note::new("a", "x", 2, 0),
        Note::new("c", "x", 3, 0),
    ]));
    let get_notes = GetNotes::new(repo);

    let ascending = get_notes
        .invoke(NoteOrder::Title(OrderDirection::Ascending))
        .next()
        .await
        .unwrap();
    assert_eq!(titles(&ascending), ["a", "b", "c"]);

    let descending = get_notes
        .invoke(NoteOrder::Title(OrderDirection::Descending))
        .next()
        .await
        .unwrap();
    assert_eq!(titles(&descending), ["c", "b", "a"]);
}

#[tokio::test]
async fn default_query_is_newest_first() {
    let repo = Arc::new(InMemoryNoteRepository::with_notes([
        Note::new("old", "x", 10, 0),
        Note::new("new", "x", 30, 0),
        Note::new("mid", "x", 20, 0),
    ]));
    let notes = GetNotes::new(repo)
        .invoke(NoteOrder::default())
        .next()
        .await
        .unwrap();
    assert_eq!(titles(&notes), ["new", "mid", "old"]);
}

#[tokio::test]
async fn live_query_resorts_after_each_write() {
    let repo = Arc::new(InMemoryNoteRepository::with_notes([Note::new("m", "x", 1, 0)]));
    let get_notes = GetNotes::new(repo.clone());
    let mut stream = get_notes.invoke(NoteOrder::Title(OrderDirection::Ascending));

    assert_eq!(titles(&stream.next().await.unwrap()), ["m"]);

    repo.insert_or_replace(&Note::new("A", "x", 2, 0)).await.unwrap();
    assert_eq!(titles(&stream.next().await.unwrap()), ["A", "m"]);

    let stored = repo.snapshot().unwrap();
    repo.delete_note(&stored[0]).await.unwrap();
    assert_eq!(titles(&stream.next().await.unwrap()), ["A"]);
}

#[tokio::test]
async fn each_invocation_is_an_independent_subscription() {
    let repo = Arc::new(InMemoryNoteRepository::with_notes([
        Note::new("b", "x", 1, 2),
        Note::new("a", "x", 2, 1),
    ]));
    let get_notes = GetNotes::new(repo.clone());
    let mut by_title = get_notes.invoke(NoteOrder::Title(OrderDirection::Ascending));
    let mut by_color = get_notes.invoke(NoteOrder::Color(OrderDirection::Descending));

    assert_eq!(titles(&by_title.next().await.unwrap()), ["a", "b"]);
    assert_eq!(titles(&by_color.next().await.unwrap()), ["b", "a"]);

    drop(by_title);
    repo.insert_or_replace(&Note::new("c", "x", 3, 3)).await.unwrap();
    assert_eq!(titles(&by_color.next().await.unwrap()), ["c", "b", "a"]);
    assert_eq!(repo.subscriber_count(), 1);
}
