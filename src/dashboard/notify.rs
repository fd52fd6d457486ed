//! Notification center backing the dashboard's toasts

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use chrono::Utc;
use tracing::{info, warn};

use crate::types::{Notification, NotificationKind};

/// Sink for user-facing success / error messages.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn error(&self, message: &str);
}

/// Bounded, in-memory notification feed. Oldest entries are evicted first.
#[derive(Debug)]
pub struct NotificationCenter {
    capacity: usize,
    next_id: AtomicU64,
    entries: Mutex<VecDeque<Notification>>,
}

impl NotificationCenter {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            entries: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    fn push(&self, kind: NotificationKind, message: &str) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            kind,
            message: message.to_string(),
            timestamp: Utc::now(),
        };
        let mut entries = self.entries.lock().unwrap_or_else(|e| {
            warn!("Notification mutex poisoned, recovering");
            e.into_inner()
        });
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(notification);
        id
    }

    /// Notifications with an id greater than `after`, oldest first.
    pub fn since(&self, after: u64) -> Vec<Notification> {
        let entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.iter().filter(|n| n.id > after).cloned().collect()
    }

    pub fn latest(&self) -> Option<Notification> {
        let entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.back().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(crate::config::defaults::NOTIFICATION_CAPACITY)
    }
}

impl Notifier for NotificationCenter {
    fn success(&self, message: &str) {
        let id = self.push(NotificationKind::Success, message);
        info!(id, "{}", message);
    }

    fn error(&self, message: &str) {
        let id = self.push(NotificationKind::Error, message);
        warn!(id, "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_increase_and_since_filters() {
        let center = NotificationCenter::new(10);
        center.success("one");
        center.error("two");
        center.success("three");

        let all = center.since(0);
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].kind, NotificationKind::Error);

        let newer = center.since(all[0].id);
        let messages: Vec<_> = newer.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, ["two", "three"]);
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let center = NotificationCenter::new(2);
        center.success("a");
        center.success("b");
        center.success("c");
        assert_eq!(center.len(), 2);
        let messages: Vec<_> = center.since(0).into_iter().map(|n| n.message).collect();
        assert_eq!(messages, ["b", "c"]);
        assert_eq!(center.latest().map(|n| n.id), Some(3));
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let center = NotificationCenter::new(0);
        center.error("x");
        assert!(!center.is_empty());
    }
}
