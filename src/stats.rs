use std::fmt::{self, Debug, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

/// Hit and miss counters of a memoized function.
///
/// Every call through the dispatcher, nested recursive calls included, counts
/// as exactly one hit or one miss. The counters can be read without entering
/// the cache's guard.
///
/// ```
/// let fib = recall::memoize(|fib, n: u64| -> u64 {
///     if n < 2 { n } else { fib.call(n - 1) + fib.call(n - 2) }
/// });
/// fib.call(10);
/// let stats = fib.stats();
/// assert_eq!(stats.misses(), 11);
/// assert_eq!(stats.hits(), 8);
/// ```
pub struct Stats {
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Stats {
    /// Create zeroed counters.
    pub const fn new() -> Self {
        Self { hits: AtomicU64::new(0), misses: AtomicU64::new(0) }
    }

    #[inline]
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// The number of calls answered from the cache.
    #[inline]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// The number of calls that executed the underlying function.
    #[inline]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// The total number of calls.
    #[inline]
    pub fn total(&self) -> u64 {
        self.hits() + self.misses()
    }

    /// The fraction of calls that were hits, or zero if there were none.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        self.hits() as f64 / total as f64
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Stats {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("Stats")
            .field("hits", &self.hits())
            .field("misses", &self.misses())
            .finish()
    }
}
