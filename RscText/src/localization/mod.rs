//! Localized string lookup
//!
//! A lookup may answer immediately ([`Lookup::Found`] / [`Lookup::Missing`])
//! or defer the answer while its backing tables are still loading
//! ([`Lookup::Pending`]). Deferred answers arrive through a [`PendingLookup`]
//! handle; dropping the handle discards the answer.

mod tables;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

pub use tables::StringTables;

/// Source of localized strings keyed by `(collection, key)`
pub trait LocalizedLookup: Send + Sync {
    /// Look up a string without blocking
    fn try_get(&self, collection: &str, key: &str) -> Lookup;
}

impl<T: LocalizedLookup + ?Sized> LocalizedLookup for Arc<T> {
    fn try_get(&self, collection: &str, key: &str) -> Lookup {
        (**self).try_get(collection, key)
    }
}

impl<T: LocalizedLookup + ?Sized> LocalizedLookup for Box<T> {
    fn try_get(&self, collection: &str, key: &str) -> Lookup {
        (**self).try_get(collection, key)
    }
}

/// Outcome of a localized lookup
#[derive(Debug)]
pub enum Lookup {
    /// The entry exists
    Found(String),
    /// The entry does not exist
    Missing,
    /// The answer is not known yet
    Pending(PendingLookup),
}

impl Lookup {
    /// Immediate answer, treating a pending lookup as missing
    #[must_use]
    pub fn ready(self) -> Option<String> {
        match self {
            Self::Found(text) => Some(text),
            Self::Missing | Self::Pending(_) => None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

/// Handle to a deferred lookup answer
#[derive(Debug)]
pub struct PendingLookup {
    receiver: Receiver<Option<String>>,
}

/// Sending half of a [`PendingLookup`]
#[derive(Debug, Clone)]
pub struct PendingAnswer {
    sender: Sender<Option<String>>,
}

impl PendingLookup {
    /// Create a connected answer/handle pair
    #[must_use]
    pub fn channel() -> (PendingAnswer, PendingLookup) {
        let (sender, receiver) = mpsc::channel();
        (PendingAnswer { sender }, PendingLookup { receiver })
    }

    /// Poll for the answer.
    ///
    /// `None` while still pending; `Some(None)` once resolved as missing or
    /// abandoned by the lookup.
    #[must_use]
    pub fn poll(&self) -> Option<Option<String>> {
        match self.receiver.try_recv() {
            Ok(answer) => Some(answer),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(None),
        }
    }

    /// Block up to `timeout` for the answer.
    ///
    /// Returns `None` on timeout, on a missing entry, or if the lookup was
    /// abandoned.
    #[must_use]
    pub fn wait(self, timeout: Duration) -> Option<String> {
        match self.receiver.recv_timeout(timeout) {
            Ok(answer) => answer,
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }
}

impl PendingAnswer {
    /// Deliver the answer.
    ///
    /// Returns `false` if the handle was already dropped.
    pub fn send(self, answer: Option<String>) -> bool {
        self.sender.send(answer).is_ok()
    }
}

/// Lookup with no localized strings at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLocalization;

impl LocalizedLookup for NoLocalization {
    fn try_get(&self, _collection: &str, _key: &str) -> Lookup {
        Lookup::Missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_channel() {
        let (answer, pending) = PendingLookup::channel();
        assert_eq!(pending.poll(), None);
        assert!(answer.send(Some("late".to_string())));
        assert_eq!(pending.wait(Duration::from_millis(10)), Some("late".to_string()));
    }

    #[test]
    fn test_dropped_handle() {
        let (answer, pending) = PendingLookup::channel();
        drop(pending);
        assert!(!answer.send(Some("discarded".to_string())));
    }

    #[test]
    fn test_abandoned_answer() {
        let (answer, pending) = PendingLookup::channel();
        drop(answer);
        assert_eq!(pending.poll(), Some(None));
    }

    #[test]
    fn test_wait_times_out() {
        let (_answer, pending) = PendingLookup::channel();
        assert_eq!(pending.wait(Duration::from_millis(5)), None);
    }

    #[test]
    fn test_ready() {
        assert_eq!(Lookup::Found("a".into()).ready(), Some("a".to_string()));
        assert_eq!(Lookup::Missing.ready(), None);
        let (_answer, pending) = PendingLookup::channel();
        assert!(Lookup::Pending(pending).is_pending());
    }
}
