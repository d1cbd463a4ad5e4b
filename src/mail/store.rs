//! Bounded in-memory mail store

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::mail::message::Message;

/// Newest-first collection holding at most `capacity` messages.
///
/// Inserting past capacity drops the oldest entries. Writers take the lock
/// exclusively; snapshots share it and copy out `Arc` handles, so readers
/// never see a partially inserted or already evicted message.
#[derive(Debug)]
pub struct MailStore {
    capacity: NonZeroUsize,
    messages: RwLock<VecDeque<Arc<Message>>>,
}

impl MailStore {
    /// Create an empty store
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            capacity,
            messages: RwLock::new(VecDeque::with_capacity(capacity.get())),
        }
    }

    /// Maximum number of retained messages
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Add a message at the newest position, evicting the oldest on overflow
    pub fn insert(&self, message: Message) -> Arc<Message> {
        let message = Arc::new(message);
        let capacity = self.capacity.get();

        let mut messages = self.messages.write();
        messages.push_front(Arc::clone(&message));

        let evicted = messages.len().saturating_sub(capacity);
        messages.truncate(capacity);
        debug_assert!(messages.len() <= capacity);
        let len = messages.len();
        drop(messages);

        if evicted > 0 {
            debug!(evicted, len, "evicted oldest messages");
        }

        message
    }

    /// Point-in-time copy of the stored messages, newest first
    pub fn snapshot(&self) -> Vec<Arc<Message>> {
        self.messages.read().iter().cloned().collect()
    }

    /// Number of stored messages
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::message::Mailbox;
    use chrono::Utc;

    fn message(subject: &str) -> Message {
        Message::new(
            vec![Mailbox::new("sender@example.com")],
            vec![Mailbox::new("recipient@example.com")],
            Utc::now(),
        )
        .with_subject(subject)
    }

    fn subjects(store: &MailStore) -> Vec<String> {
        store
            .snapshot()
            .iter()
            .filter_map(|message| message.subject.clone())
            .collect()
    }

    fn capacity(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_new_store_is_empty() {
        let store = MailStore::new(capacity(3));

        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert_eq!(store.capacity(), 3);
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_newest_first() {
        let store = MailStore::new(capacity(5));
        store.insert(message("A"));
        store.insert(message("B"));
        store.insert(message("C"));

        assert_eq!(subjects(&store), vec!["C", "B", "A"]);
    }

    #[test]
    fn test_eviction_keeps_most_recent() {
        let store = MailStore::new(capacity(2));
        store.insert(message("A"));
        store.insert(message("B"));
        store.insert(message("C"));

        assert_eq!(subjects(&store), vec!["C", "B"]);
    }

    #[test]
    fn test_capacity_holds_after_every_insert() {
        let store = MailStore::new(capacity(4));

        for i in 0..20 {
            store.insert(message(&i.to_string()));
            assert!(store.len() <= 4);
            assert_eq!(store.len(), (i + 1).min(4));
        }

        assert_eq!(subjects(&store), vec!["19", "18", "17", "16"]);
    }

    #[test]
    fn test_capacity_one() {
        let store = MailStore::new(capacity(1));
        store.insert(message("A"));
        store.insert(message("B"));

        assert_eq!(subjects(&store), vec!["B"]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let store = MailStore::new(capacity(2));
        store.insert(message("A"));

        let before = store.snapshot();
        store.insert(message("B"));
        store.insert(message("C"));

        assert_eq!(before.len(), 1);
        assert_eq!(before[0].subject.as_deref(), Some("A"));
        assert_eq!(subjects(&store), vec!["C", "B"]);
    }

    #[test]
    fn test_insert_returns_stored_handle() {
        let store = MailStore::new(capacity(2));
        let stored = store.insert(message("A"));

        assert!(Arc::ptr_eq(&stored, &store.snapshot()[0]));
    }
}
