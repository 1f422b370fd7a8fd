use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use fsdict_index::Index;
use lru::LruCache;
use tracing::trace;

/// Recently used bucket indexes, keyed by index file path.
///
/// A read optimization only: writers load the index from disk, mutate it,
/// persist it, and then replace the cached copy.
pub(crate) enum IndexCache {
    Disabled,
    Enabled(Mutex<LruCache<PathBuf, Arc<Index>>>),
}

impl IndexCache {
    /// A cache holding up to `capacity` indexes; zero disables it.
    pub(crate) fn new(capacity: usize) -> Self {
        let Some(capacity) = NonZeroUsize::new(capacity) else {
            return Self::Disabled;
        };
        Self::Enabled(Mutex::new(LruCache::new(capacity)))
    }

    pub(crate) fn get(&self, path: &Path) -> Option<Arc<Index>> {
        let Self::Enabled(cache) = self else {
            return None;
        };
        let hit = cache.lock().expect("index cache poisoned").get(path).cloned();
        if hit.is_some() {
            trace!(path = %path.display(), "index cache hit");
        }
        hit
    }

    pub(crate) fn put(&self, path: PathBuf, index: Arc<Index>) {
        if let Self::Enabled(cache) = self {
            let mut cache = cache.lock().expect("index cache poisoned");
            if let Some((evicted, _)) = cache.push(path.clone(), index) {
                if evicted != path {
                    trace!(path = %evicted.display(), "index cache eviction");
                }
            }
        }
    }

    pub(crate) fn invalidate(&self, path: &Path) {
        if let Self::Enabled(cache) = self {
            cache.lock().expect("index cache poisoned").pop(path);
        }
    }

    pub(crate) fn clear(&self) {
        if let Self::Enabled(cache) = self {
            cache.lock().expect("index cache poisoned").clear();
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::Disabled => 0,
            Self::Enabled(cache) => cache.lock().expect("index cache poisoned").len(),
        }
    }
}

impl fmt::Debug for IndexCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disabled => f.write_str("IndexCache::Disabled"),
            Self::Enabled(_) => f
                .debug_struct("IndexCache")
                .field("cached", &self.len())
                .finish(),
        }
    }
}
