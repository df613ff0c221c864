use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard};

use lru::LruCache;

use super::loader::{normalize_name, DatasetSource};
use super::model::Dataset;
use super::DatasetError;

/// Default number of datasets kept in memory.
pub const DEFAULT_CACHE_CAPACITY: usize = 10;

// ---------------------------------------------------------------------------
// Bounded LRU of loaded datasets
// ---------------------------------------------------------------------------

/// Thread-safe LRU map from normalized dataset name to loaded dataset.
pub struct DatasetCache {
    entries: Mutex<LruCache<String, Arc<Dataset>>>,
}

impl DatasetCache {
    /// A capacity of zero is clamped to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Arc<Dataset>>> {
        // Entries are whole `Arc`s; a panic mid-insert cannot leave one torn.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Look up `name`, marking it most recently used.
    pub fn get(&self, name: &str) -> Option<Arc<Dataset>> {
        self.lock().get(name).cloned()
    }

    /// Insert `dataset`, evicting the least recently used entry when full.
    pub fn insert(&self, name: String, dataset: Arc<Dataset>) {
        if let Some((evicted, _)) = self.lock().push(name.clone(), dataset) {
            if evicted != name {
                log::info!("evicted dataset '{evicted}' from cache");
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lock().contains(name)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.lock().cap().get()
    }
}

// ---------------------------------------------------------------------------
// Registry: source + cache
// ---------------------------------------------------------------------------

/// Lazily loads datasets from a [`DatasetSource`] and memoizes them.
///
/// Two concurrent first requests for the same name may both hit the source;
/// the later insert wins and both see identical content.
pub struct DatasetRegistry {
    source: Box<dyn DatasetSource>,
    cache: DatasetCache,
}

impl DatasetRegistry {
    pub fn new(source: impl DatasetSource + 'static, capacity: usize) -> Self {
        Self {
            source: Box::new(source),
            cache: DatasetCache::new(capacity),
        }
    }

    pub fn cache(&self) -> &DatasetCache {
        &self.cache
    }

    /// Return the dataset for `name`, loading it on a cache miss.
    ///
    /// Fails with [`DatasetError::Empty`] for a dataset without rows; empty
    /// datasets are not cached.
    pub fn get(&self, name: &str) -> Result<Arc<Dataset>, DatasetError> {
        let name = normalize_name(name);
        if let Some(hit) = self.cache.get(&name) {
            log::debug!("cache hit for dataset '{name}'");
            return Ok(hit);
        }

        let dataset = self.source.load(&name)?;
        if dataset.is_empty() {
            return Err(DatasetError::Empty { name });
        }

        let dataset = Arc::new(dataset);
        self.cache.insert(name, Arc::clone(&dataset));
        Ok(dataset)
    }
}
