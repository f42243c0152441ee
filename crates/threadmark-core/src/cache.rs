use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::heading;

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Point-in-time view of cache activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheSnapshot {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }
}

/// Memoized heading conversion.
///
/// [`heading::convert`] is pure, so a previously rendered line can be served
/// from the map without changing observable behavior. Entries never expire;
/// `clear` drops them while keeping the hit/miss counters.
#[derive(Debug, Default)]
pub struct RenderCache {
    entries: DashMap<String, String>,
    counters: Counters,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn convert(&self, line: &str) -> String {
        if let Some(rendered) = self.entries.get(line) {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
            return rendered.clone();
        }

        self.counters.misses.fetch_add(1, Ordering::Relaxed);
        let rendered = heading::convert(line);
        self.entries.insert(line.to_string(), rendered.clone());
        rendered
    }

    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}
