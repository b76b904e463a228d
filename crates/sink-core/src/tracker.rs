//! In-flight write bookkeeping.

use std::collections::HashSet;
use std::sync::Mutex;

/// Identity of one submitted-but-unacknowledged write.
///
/// `(partition, offset)` is unique within a batch; the key is created
/// when a message is accepted for submission and removed when its
/// completion event settles, or dropped wholesale when a batch is
/// abandoned after connectivity loss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingWriteKey {
    pub partition: i32,
    pub offset: i64,
}

impl PendingWriteKey {
    pub fn new(partition: i32, offset: i64) -> Self {
        Self { partition, offset }
    }
}

impl From<&volt_types::SinkRecord> for PendingWriteKey {
    fn from(record: &volt_types::SinkRecord) -> Self {
        Self::new(record.partition, record.offset)
    }
}

impl std::fmt::Display for PendingWriteKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.partition, self.offset)
    }
}

/// Concurrent set of pending-write keys.
///
/// The submission loop registers keys; completion watchers running on
/// other tasks unregister them. A key present in the set means its write
/// has been submitted and neither acknowledged nor bulk-cleared.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    pending: Mutex<HashSet<PendingWriteKey>>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key. Callers guarantee key uniqueness within a batch.
    pub fn register(&self, key: PendingWriteKey) {
        self.pending.lock().unwrap().insert(key);
    }

    /// Remove a key. Removing an absent key is a no-op: the key may
    /// already have been bulk-cleared before its completion event fired.
    pub fn unregister(&self, key: &PendingWriteKey) {
        self.pending.lock().unwrap().remove(key);
    }

    /// Number of writes still outstanding.
    pub fn len(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.lock().unwrap().is_empty()
    }

    /// Drop every key at once, used when a whole batch is abandoned so
    /// no stale completion can block a future checkpoint.
    pub fn clear(&self) {
        self.pending.lock().unwrap().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_register_unregister() {
        let tracker = InFlightTracker::new();
        let key = PendingWriteKey::new(0, 42);
        tracker.register(key);
        assert_eq!(tracker.len(), 1);
        tracker.unregister(&key);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_unregister_absent_key_is_noop() {
        let tracker = InFlightTracker::new();
        tracker.unregister(&PendingWriteKey::new(3, 7));
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_clear_drops_everything() {
        let tracker = InFlightTracker::new();
        for offset in 0..10 {
            tracker.register(PendingWriteKey::new(1, offset));
        }
        tracker.clear();
        assert!(tracker.is_empty());
        // A completion arriving after the bulk clear is still a no-op.
        tracker.unregister(&PendingWriteKey::new(1, 5));
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_register_and_unregister() {
        let tracker = Arc::new(InFlightTracker::new());

        let mut handles = Vec::new();
        for partition in 0..4i32 {
            let tracker = Arc::clone(&tracker);
            handles.push(tokio::spawn(async move {
                for offset in 0..250i64 {
                    let key = PendingWriteKey::new(partition, offset);
                    tracker.register(key);
                    tracker.unregister(&key);
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }
        assert!(tracker.is_empty());
    }
}
