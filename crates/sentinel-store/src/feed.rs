//! Bounded log of recent certificate events, newest first.
//!
//! Display only. Nothing in the trust path reads from the feed.

use std::collections::VecDeque;
use std::sync::Mutex;

use sentinel_core::Sha256Hash;
use serde::{Deserialize, Serialize};

use crate::traits::ContentId;

/// Default number of retained events.
pub const DEFAULT_FEED_CAPACITY: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A credential was issued and published.
    Issued,
    /// A stored credential was fetched and passed verification.
    Verified,
    /// A stored credential was fetched and failed verification.
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEvent {
    pub content_id: ContentId,
    pub model_identity: Sha256Hash,
    pub kind: EventKind,
    pub received_at_ms: i64,
}

impl FeedEvent {
    /// An event stamped with the current time.
    pub fn now(content_id: ContentId, model_identity: Sha256Hash, kind: EventKind) -> Self {
        Self {
            content_id,
            model_identity,
            kind,
            received_at_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Ring buffer of [`FeedEvent`]s. The oldest event is dropped once full.
#[derive(Debug)]
pub struct EventFeed {
    capacity: usize,
    events: Mutex<VecDeque<FeedEvent>>,
}

impl EventFeed {
    /// A feed retaining at most `capacity` events (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            events: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn push(&self, event: FeedEvent) {
        let mut events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        if events.len() == self.capacity {
            events.pop_back();
        }
        events.push_front(event);
    }

    /// Snapshot of retained events, newest first.
    pub fn recent(&self) -> Vec<FeedEvent> {
        let events = self.events.lock().unwrap_or_else(|e| e.into_inner());
        events.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for EventFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(n: u8) -> FeedEvent {
        FeedEvent {
            content_id: ContentId::for_bytes(&[n]),
            model_identity: Sha256Hash::hash(b"model"),
            kind: EventKind::Issued,
            received_at_ms: i64::from(n),
        }
    }

    #[test]
    fn test_newest_first() {
        let feed = EventFeed::new(3);
        feed.push(event(1));
        feed.push(event(2));
        let recent = feed.recent();
        assert_eq!(recent[0].received_at_ms, 2);
        assert_eq!(recent[1].received_at_ms, 1);
    }

    #[test]
    fn test_bounded() {
        let feed = EventFeed::default();
        for n in 0..25 {
            feed.push(event(n));
        }
        assert_eq!(feed.len(), DEFAULT_FEED_CAPACITY);
        let recent = feed.recent();
        assert_eq!(recent.first().unwrap().received_at_ms, 24);
        assert_eq!(recent.last().unwrap().received_at_ms, 15);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let feed = EventFeed::new(0);
        feed.push(event(1));
        feed.push(event(2));
        assert_eq!(feed.capacity(), 1);
        assert_eq!(feed.recent()[0].received_at_ms, 2);
    }

    #[test]
    fn test_event_serializes_with_cid() {
        let json = serde_json::to_value(event(7)).unwrap();
        assert!(json["content_id"].as_str().unwrap().starts_with("bafkrei"));
        assert_eq!(json["kind"], "issued");
    }
}
