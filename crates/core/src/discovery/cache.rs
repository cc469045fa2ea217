use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::error::DiscoveryError;

/// A nested jar copied out of its parent package, held in memory so the
/// parent archive does not stay open while children are scanned.
#[derive(Debug, Clone)]
pub struct ExtractedJar {
    /// Unique synthetic origin, `parent-canonical-origin!/entry-path`.
    pub name: String,
    pub bytes: Arc<[u8]>,
}

/// Memoizes "nested jars extracted from this origin", keyed by canonical
/// origin. Extraction runs exactly once per origin no matter how many
/// discovery paths reach it concurrently; the per-key entry lock makes the
/// compute-and-insert atomic without a global lock.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    extracted: DashMap<String, Arc<Vec<ExtractedJar>>>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_extract<F>(
        &self,
        origin: &str,
        extract: F,
    ) -> Result<Arc<Vec<ExtractedJar>>, DiscoveryError>
    where
        F: FnOnce() -> Result<Vec<ExtractedJar>, DiscoveryError>,
    {
        match self.extracted.entry(origin.to_string()) {
            Entry::Occupied(hit) => Ok(Arc::clone(hit.get())),
            Entry::Vacant(slot) => {
                let jars = Arc::new(extract()?);
                slot.insert(Arc::clone(&jars));
                Ok(jars)
            }
        }
    }

    pub fn origin_count(&self) -> usize {
        self.extracted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn jar(name: &str) -> ExtractedJar {
        ExtractedJar {
            name: name.to_string(),
            bytes: Arc::from(Vec::new().into_boxed_slice()),
        }
    }

    #[test]
    fn extraction_runs_exactly_once_per_origin() {
        let cache = ExtractionCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..4 {
            let jars = cache
                .get_or_extract("/mods/outer.jar", || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![jar("/mods/outer.jar!/inner.jar")])
                })
                .unwrap();
            assert_eq!(jars.len(), 1);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.origin_count(), 1);
    }

    #[test]
    fn concurrent_reachers_share_one_extraction() {
        let cache = Arc::new(ExtractionCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                std::thread::spawn(move || {
                    cache
                        .get_or_extract("/mods/shared.jar", || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            Ok(vec![jar("/mods/shared.jar!/inner.jar")])
                        })
                        .unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn a_failed_extraction_is_not_cached() {
        let cache = ExtractionCache::new();
        let err = cache.get_or_extract("/mods/bad.jar", || {
            Err(DiscoveryError::NestedExtraction {
                origin: "/mods/bad.jar".to_string(),
                entry: "inner.jar".to_string(),
                reason: "entry not found".to_string(),
            })
        });
        assert!(err.is_err());
        assert_eq!(cache.origin_count(), 0);
    }
}
