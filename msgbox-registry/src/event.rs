//! Append-only record of successful deposits.

use msgbox_common::IdentityDigest;
use serde::{Deserialize, Serialize};

use crate::message::Message;

/// One successful deposit: who, and what they deposited.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub identity_digest: IdentityDigest,
    pub message: Message,
}

/// Ordered log of deposit events, immutable once appended.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Events in commit order; the iterator is lazy and restartable.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
