//! Build-once chart cache keyed by source path.
//!
//! Each key owns a slot. The first caller for a key builds the chart while
//! concurrent callers for the same key wait on that build and receive the
//! same chart or the same error. Failed builds are evicted so the next call
//! tries again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use tracing::debug;

use crate::chart::RateChart;
use crate::error::Result;

type Slot = Arc<OnceLock<Result<Arc<RateChart>>>>;

#[derive(Debug, Default)]
pub struct ChartCache {
    slots: Mutex<HashMap<PathBuf, Slot>>,
}

impl ChartCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the chart cached for `key`, running `build` if there is none.
    pub fn get_or_build<F>(&self, key: &Path, build: F) -> Result<Arc<RateChart>>
    where
        F: FnOnce() -> Result<RateChart>,
    {
        let slot = {
            let mut slots = self.lock();
            slots.entry(key.to_path_buf()).or_default().clone()
        };

        if let Some(Ok(chart)) = slot.get() {
            debug!(key = %key.display(), "Chart cache hit");
            return Ok(chart.clone());
        }

        let result = slot.get_or_init(|| build().map(Arc::new)).clone();

        if result.is_err() {
            let mut slots = self.lock();
            if slots.get(key).is_some_and(|current| Arc::ptr_eq(current, &slot)) {
                slots.remove(key);
            }
        }

        result
    }

    /// Builds a fresh chart for `key` and replaces the cached one.
    ///
    /// On failure the previous entry, if any, is left in place.
    pub fn rebuild<F>(&self, key: &Path, build: F) -> Result<Arc<RateChart>>
    where
        F: FnOnce() -> Result<RateChart>,
    {
        let chart = Arc::new(build()?);
        let slot = Arc::new(OnceLock::from(Ok(chart.clone())));

        self.lock().insert(key.to_path_buf(), slot);
        Ok(chart)
    }

    /// Drops the entry for `key`. Returns whether one was present.
    pub fn invalidate(&self, key: &Path) -> bool {
        self.lock().remove(key).is_some()
    }

    /// The successfully built chart for `key`, if any.
    pub fn get(&self, key: &Path) -> Option<Arc<RateChart>> {
        let slot = self.lock().get(key)?.clone();
        match slot.get() {
            Some(Ok(chart)) => Some(chart.clone()),
            _ => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<PathBuf, Slot>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, QuoteError};
    use crate::parser::parse_chart;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const CHART: &str = "miles_start,miles_end,100,12000 and over\n0,10,1,2\n";

    fn build_counted(counter: &AtomicUsize) -> Result<RateChart> {
        counter.fetch_add(1, Ordering::SeqCst);
        parse_chart(CHART)
    }

    #[test]
    fn test_builds_once_per_key() {
        let cache = ChartCache::new();
        let builds = AtomicUsize::new(0);

        let a = cache.get_or_build(Path::new("a.csv"), || build_counted(&builds)).unwrap();
        let b = cache.get_or_build(Path::new("a.csv"), || build_counted(&builds)).unwrap();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(builds.load(Ordering::SeqCst), 1);

        cache.get_or_build(Path::new("b.csv"), || build_counted(&builds)).unwrap();
        assert_eq!(builds.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_failed_build_is_not_cached() {
        let cache = ChartCache::new();
        let key = Path::new("a.csv");

        let err = cache
            .get_or_build(key, || Err(QuoteError::malformed("boom")))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedChart);
        assert!(cache.get(key).is_none());

        assert!(cache.get_or_build(key, || parse_chart(CHART)).is_ok());
        assert!(cache.get(key).is_some());
    }

    #[test]
    fn test_rebuild_replaces_entry() {
        let cache = ChartCache::new();
        let key = Path::new("a.csv");

        let first = cache.get_or_build(key, || parse_chart(CHART)).unwrap();
        let second = cache.rebuild(key, || parse_chart(CHART)).unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
        assert!(Arc::ptr_eq(&cache.get(key).unwrap(), &second));
    }

    #[test]
    fn test_failed_rebuild_keeps_previous() {
        let cache = ChartCache::new();
        let key = Path::new("a.csv");

        let first = cache.get_or_build(key, || parse_chart(CHART)).unwrap();
        assert!(cache.rebuild(key, || Err(QuoteError::malformed("boom"))).is_err());
        assert!(Arc::ptr_eq(&cache.get(key).unwrap(), &first));
    }

    #[test]
    fn test_invalidate() {
        let cache = ChartCache::new();
        let key = Path::new("a.csv");

        assert!(!cache.invalidate(key));
        cache.get_or_build(key, || parse_chart(CHART)).unwrap();
        assert!(cache.invalidate(key));
        assert!(cache.get(key).is_none());
    }

    #[test]
    fn test_concurrent_callers_share_one_build() {
        let cache = ChartCache::new();
        let builds = AtomicUsize::new(0);
        let key = Path::new("shared.csv");

        let charts: Vec<Arc<RateChart>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        cache
                            .get_or_build(key, || {
                                std::thread::sleep(std::time::Duration::from_millis(20));
                                build_counted(&builds)
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert!(charts.iter().all(|c| Arc::ptr_eq(c, &charts[0])));
    }
}
