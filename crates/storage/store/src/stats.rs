use std::sync::atomic::{AtomicU64, Ordering};

/// Operation counters for a store, exposed via `PageStore::stats`.
#[derive(Debug, Default)]
pub struct Stats {
    reads: AtomicU64,
    writes: AtomicU64,
    news: AtomicU64,
    appends: AtomicU64,
    wipes: AtomicU64,
}

/// A point-in-time snapshot of [`Stats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub reads: u64,
    pub writes: u64,
    pub news: u64,
    pub appends: u64,
    pub wipes: u64,
}

impl Stats {
    pub(crate) fn record_read(&self) {
        self.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_new(&self) {
        self.news.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_append(&self) {
        self.appends.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_wipe(&self) {
        self.wipes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
            news: self.news.load(Ordering::Relaxed),
            appends: self.appends.load(Ordering::Relaxed),
            wipes: self.wipes.load(Ordering::Relaxed),
        }
    }
}
