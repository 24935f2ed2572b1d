//! Process-lifetime counters shared by all per-file workers.

use std::collections::BTreeMap;
use std::sync::Mutex;

/// Copy of the counters at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub total: u64,
    pub per_category: BTreeMap<String, u64>,
}

#[derive(Debug, Default)]
pub struct Stats {
    inner: Mutex<StatsSnapshot>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one organized file under `category`.
    pub fn record(&self, category: &str) {
        let mut s = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        s.total += 1;
        *s.per_category.entry(category.to_string()).or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    pub fn total(&self) -> u64 {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn concurrent_records_are_all_counted() {
        let stats = Arc::new(Stats::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let stats = Arc::clone(&stats);
                thread::spawn(move || {
                    for _ in 0..100 {
                        stats.record(if i % 2 == 0 { "images" } else { "other" });
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let snap = stats.snapshot();
        assert_eq!(snap.total, 800);
        assert_eq!(snap.per_category.get("images"), Some(&400));
        assert_eq!(snap.per_category.get("other"), Some(&400));
    }
}
