use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time counters for one queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    pub published: u64,
    pub delivered: u64,
    pub acknowledged: u64,
}

impl QueueStats {
    /// Deliveries handed to the consumer but not yet acknowledged.
    pub fn unacknowledged(&self) -> u64 {
        self.delivered.saturating_sub(self.acknowledged)
    }

    /// Messages published but not yet handed to the consumer.
    pub fn ready(&self) -> u64 {
        self.published.saturating_sub(self.delivered)
    }
}

#[derive(Debug, Default)]
pub(crate) struct QueueCounters {
    published: AtomicU64,
    delivered: AtomicU64,
    acknowledged: AtomicU64,
}

impl QueueCounters {
    pub(crate) fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the delivery tag of the delivery being recorded.
    pub(crate) fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record_acknowledged(&self) {
        self.acknowledged.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            published: self.published.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            acknowledged: self.acknowledged.load(Ordering::Relaxed),
        }
    }
}
