use super::{CoordinateTransform, ProjectionError, TransformProvider};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use tracing::debug;

type CrsPair = (String, String);

/// Statistics for cache usage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (handles built)
    pub misses: u64,
    /// Number of handles currently cached
    pub size: usize,
}

/// Memoizes transform handles per `(source, destination)` CRS pair.
///
/// Unbounded: the set of pairs a process sees is tiny. Failed builds are not
/// cached, so a provider that fails keeps being asked.
pub struct TransformerCache {
    provider: Box<dyn TransformProvider>,
    handles: RwLock<HashMap<CrsPair, Arc<dyn CoordinateTransform>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TransformerCache {
    pub fn new(provider: impl TransformProvider + 'static) -> Self {
        Self::from_boxed(Box::new(provider))
    }

    pub fn from_boxed(provider: Box<dyn TransformProvider>) -> Self {
        Self {
            provider,
            handles: RwLock::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Return the cached handle for a pair, building it on first use.
    pub fn get_or_create(
        &self,
        source_crs: &str,
        target_crs: &str,
    ) -> Result<Arc<dyn CoordinateTransform>, ProjectionError> {
        let key = (source_crs.to_string(), target_crs.to_string());

        if let Ok(handles) = self.handles.read() {
            if let Some(handle) = handles.get(&key) {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Ok(Arc::clone(handle));
            }
        }

        let mut handles = match self.handles.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        // Another caller may have populated the entry between the two locks.
        if let Some(handle) = handles.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(handle));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        debug!("Building transformer {} -> {}", source_crs, target_crs);
        let handle = self.provider.create(source_crs, target_crs)?;
        handles.insert(key, Arc::clone(&handle));
        Ok(handle)
    }

    /// Transform coordinate arrays with the cached handle for a pair.
    pub fn transform(
        &self,
        source_crs: &str,
        target_crs: &str,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<(Vec<f64>, Vec<f64>), ProjectionError> {
        self.get_or_create(source_crs, target_crs)?.transform(xs, ys)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            size: self.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.handles.read().map(|h| h.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all cached handles and reset statistics.
    pub fn clear(&self) {
        if let Ok(mut handles) = self.handles.write() {
            handles.clear();
        }
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }
}

impl std::fmt::Debug for TransformerCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransformerCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    struct Offset(f64);

    impl CoordinateTransform for Offset {
        fn transform(
            &self,
            xs: &[f64],
            ys: &[f64],
        ) -> Result<(Vec<f64>, Vec<f64>), ProjectionError> {
            Ok((
                xs.iter().map(|x| x + self.0).collect(),
                ys.iter().map(|y| y + self.0).collect(),
            ))
        }
    }

    #[derive(Default)]
    struct CountingProvider {
        created: Arc<AtomicUsize>,
    }

    impl TransformProvider for CountingProvider {
        fn create(
            &self,
            _source_crs: &str,
            target_crs: &str,
        ) -> Result<Arc<dyn CoordinateTransform>, ProjectionError> {
            if target_crs == "EPSG:0" {
                return Err(ProjectionError::UnsupportedCrs(target_crs.to_string()));
            }
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Arc::new(Offset(1.0)))
        }
    }

    #[test]
    fn test_handles_are_reused_per_pair() {
        let provider = CountingProvider::default();
        let created = Arc::clone(&provider.created);
        let cache = TransformerCache::new(provider);

        for _ in 0..3 {
            cache.get_or_create("EPSG:4258", "EPSG:25831").unwrap();
        }
        cache.get_or_create("EPSG:4258", "EPSG:25830").unwrap();

        assert_eq!(created.load(Ordering::SeqCst), 2);
        assert_eq!(
            cache.stats(),
            CacheStats {
                hits: 2,
                misses: 2,
                size: 2
            }
        );
    }

    #[test]
    fn test_failed_builds_are_not_cached() {
        let cache = TransformerCache::new(CountingProvider::default());

        assert!(cache.get_or_create("EPSG:4258", "EPSG:0").is_err());
        assert!(cache.get_or_create("EPSG:4258", "EPSG:0").is_err());
        assert!(cache.is_empty());
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_transform_and_clear() {
        let cache = TransformerCache::new(CountingProvider::default());
        let (xs, ys) = cache
            .transform("EPSG:4258", "EPSG:25831", &[1.0, 2.0], &[3.0, 4.0])
            .unwrap();
        assert_eq!(xs, vec![2.0, 3.0]);
        assert_eq!(ys, vec![4.0, 5.0]);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
