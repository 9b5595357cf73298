//! Counters describing cache behaviour.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of a cache's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    /// Lookups answered from a fresh entry.
    pub hits: u64,
    /// Lookups that captured a new snapshot (cold, expired or invalidated).
    pub captures: u64,
    /// Calls to `invalidate` that found an entry to drop.
    pub invalidations: u64,
}

impl CacheStats {
    /// Fraction of lookups served without capturing. `0.0` before any lookup.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_ratio(&self) -> f64 {
        let total = self.hits + self.captures;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Live counters, updated with relaxed ordering.
#[derive(Debug, Default)]
pub(crate) struct Counters {
    hits: AtomicU64,
    captures: AtomicU64,
    invalidations: AtomicU64,
}

impl Counters {
    pub(crate) fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn capture(&self) {
        self.captures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn invalidation(&self) {
        self.invalidations.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn read(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            captures: self.captures.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_ratio_counts_hits_over_lookups() {
        assert!((CacheStats::default().hit_ratio() - 0.0).abs() < f64::EPSILON);
        let stats = CacheStats {
            hits: 3,
            captures: 1,
            invalidations: 0,
        };
        assert!((stats.hit_ratio() - 0.75).abs() < f64::EPSILON);
    }

    #[test]
    fn counters_accumulate() {
        let counters = Counters::default();
        counters.hit();
        counters.hit();
        counters.capture();
        counters.invalidation();
        assert_eq!(
            counters.read(),
            CacheStats {
                hits: 2,
                captures: 1,
                invalidations: 1
            }
        );
    }
}
