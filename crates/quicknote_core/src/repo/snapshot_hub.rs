//! Fan-out of note snapshots to live subscribers.
//!
//! Callers must serialize `subscribe` and `publish` with the writes they
//! describe (hold the store lock across both), otherwise a subscriber could
//! see its seed snapshot after a newer one.

use crate::model::note::Note;
use crate::repo::note_repo::NoteStream;
use futures::StreamExt;
use log::trace;
use std::sync::{Mutex, PoisonError};
use tokio::sync::mpsc::{self, UnboundedSender};
use tokio_stream::wrappers::UnboundedReceiverStream;

/// Registry of per-subscriber unbounded queues.
#[derive(Default)]
pub struct SnapshotHub {
    subscribers: Mutex<Vec<UnboundedSender<Vec<Note>>>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a subscriber whose stream starts with `current`.
    pub fn subscribe(&self, current: Vec<Note>) -> NoteStream {
        let (sender, receiver) = mpsc::unbounded_channel();
        // Receiver is alive here, send cannot fail.
        let _ = sender.send(current);
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(sender);
        UnboundedReceiverStream::new(receiver).boxed()
    }

    /// Sends `snapshot` to every live subscriber and forgets dropped ones.
    pub fn publish(&self, snapshot: &[Note]) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|sender| sender.send(snapshot.to_vec()).is_ok());
        trace!(
            "event=snapshot_publish module=repo status=ok subscribers={} notes={}",
            subscribers.len(),
            snapshot.len()
        );
    }

    /// Number of subscribers that were alive at the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::SnapshotHub;
    use crate::model::note::Note;
    use futures::StreamExt;

    fn note(title: &str) -> Note {
        Note::new(title, "body", 1, 0)
    }

    #[tokio::test]
    async fn subscriber_sees_seed_then_every_publish() {
        let hub = SnapshotHub::new();
        let mut stream = hub.subscribe(vec![note("seed")]);
        hub.publish(&[note("one")]);
        hub.publish(&[note("one"), note("two")]);

        assert_eq!(stream.next().await.unwrap()[0].title, "seed");
        assert_eq!(stream.next().await.unwrap().len(), 1);
        assert_eq!(stream.next().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn dropped_subscribers_are_pruned_on_publish() {
        let hub = SnapshotHub::new();
        let kept = hub.subscribe(Vec::new());
        let dropped = hub.subscribe(Vec::new());
        assert_eq!(hub.subscriber_count(), 2);

        drop(dropped);
        hub.publish(&[]);
        assert_eq!(hub.subscriber_count(), 1);
        drop(kept);
    }
}
