//! The directory-tree store tying addressing and bucket indexes together.

use std::collections::BTreeMap;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use fsdict_hash::{Hash, HashError};
use fsdict_index::{decimal, Index};
use tracing::{debug, trace, warn};

use crate::cache::IndexCache;
use crate::config::DictionaryOptions;
use crate::error::{StoreError, StoreResult};
use crate::route::{Mode, NodeKind, Route};
use crate::traits::FileDictionary;
use crate::walk::References;

/// Name of the addressing record in a dictionary root.
pub const HASH_FILE: &str = "hash";
/// Name of the index file in every bucket.
pub const INDEX_FILE: &str = "index";

/// A file-backed dictionary rooted at one directory.
///
/// The dictionary holds nothing but its root, its addressing, and a cache of
/// parsed bucket indexes; any number of instances may be opened over the
/// same directory. The on-disk bucket index is always the source of truth:
/// every mutation loads it from disk, changes it, and writes it back.
#[derive(Debug)]
pub struct Dictionary {
    addressing: Hash,
    directory: Route,
    options: DictionaryOptions,
    cache: IndexCache,
}

impl Dictionary {
    /// Wrap an already initialized directory. Performs no I/O.
    pub fn new(addressing: Hash, directory: Route) -> Self {
        let options = DictionaryOptions::default();
        Self {
            addressing,
            directory,
            options,
            cache: IndexCache::new(options.cache_capacity),
        }
    }

    /// Replace the runtime options, dropping any cached indexes.
    pub fn with_options(mut self, options: DictionaryOptions) -> Self {
        self.cache = IndexCache::new(options.cache_capacity);
        self.options = options;
        self
    }

    fn initialize(addressing: &Hash, directory: &Route) -> StoreResult<()> {
        directory.init(NodeKind::Directory)?;
        directory
            .join(HASH_FILE)
            .store(format!("{}\n", addressing.record()).as_bytes())?;
        Ok(())
    }

    /// Create a dictionary at `directory` with the given addressing.
    ///
    /// Fails with `AlreadyInitialized` if the directory already holds one.
    pub fn create(addressing: Hash, directory: impl AsRef<Path>) -> StoreResult<Self> {
        let directory = Route::from_path(directory.as_ref());
        if directory.join(HASH_FILE).exists() {
            return Err(StoreError::AlreadyInitialized(directory.path().to_path_buf()));
        }
        Self::initialize(&addressing, &directory)?;
        debug!(path = %directory, addressing = %addressing, "dictionary created");
        Ok(Self::new(addressing, directory))
    }

    /// Open the dictionary at `directory`.
    ///
    /// Fails with `NotInitialized` if there is no hash record and with a
    /// configuration error if the record cannot be parsed.
    pub fn open(directory: impl AsRef<Path>) -> StoreResult<Self> {
        let directory = Route::from_path(directory.as_ref());
        let data = match directory.join(HASH_FILE).load() {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StoreError::NotInitialized(directory.path().to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        let record = String::from_utf8(data).map_err(|e| {
            HashError::MalformedRecord(String::from_utf8_lossy(e.as_bytes()).into_owned())
        })?;
        let addressing = Hash::parse_record(&record)?;
        debug!(path = %directory, addressing = %addressing, "dictionary opened");
        Ok(Self::new(addressing, directory))
    }

    /// Open the dictionary at `directory`, creating it if there is none.
    ///
    /// `addressing` (default: [`Hash::default`]) only applies on creation.
    pub fn open_or_create(directory: impl AsRef<Path>, addressing: Option<Hash>) -> StoreResult<Self> {
        let directory = directory.as_ref();
        if directory.join(HASH_FILE).exists() {
            Self::open(directory)
        } else {
            Self::create(addressing.unwrap_or_default(), directory)
        }
    }

    /// The addressing scheme.
    pub fn addressing(&self) -> &Hash {
        &self.addressing
    }

    /// The root directory.
    pub fn directory(&self) -> &Route {
        &self.directory
    }

    /// The runtime options.
    pub fn options(&self) -> DictionaryOptions {
        self.options
    }

    /// The bucket directory `key` hashes to.
    pub fn bucket(&self, key: &[u8]) -> Route {
        self.directory.extend(self.addressing.compute(key))
    }

    // ---------------------------------------------------------------
    // Bucket indexes
    // ---------------------------------------------------------------

    /// Load an index from disk, bypassing the cache.
    fn load_index(&self, index_route: &Route) -> StoreResult<Index> {
        Ok(Index::from_bytes(&index_route.load()?)?)
    }

    /// Load an index through the cache.
    pub(crate) fn cached_index(&self, index_route: &Route) -> StoreResult<Arc<Index>> {
        if let Some(index) = self.cache.get(index_route.path()) {
            return Ok(index);
        }
        let index = Arc::new(self.load_index(index_route)?);
        self.cache.put(index_route.path().to_path_buf(), Arc::clone(&index));
        Ok(index)
    }

    /// Write an index to disk and make it the cached copy.
    fn persist_index(&self, index_route: &Route, index: Index) -> StoreResult<()> {
        let mut writer = BufWriter::new(index_route.open(Mode::Write)?);
        index.store(&mut writer)?;
        writer.flush()?;
        trace!(path = %index_route, entries = index.len(), counter = index.counter(), "index persisted");
        self.cache.put(index_route.path().to_path_buf(), Arc::new(index));
        Ok(())
    }

    /// Re-read the bucket index of `key` from disk.
    ///
    /// For use when another writer may have changed the bucket since it was
    /// cached.
    pub fn refresh(&self, key: &[u8]) -> StoreResult<()> {
        let index_route = self.bucket(key).join(INDEX_FILE);
        if index_route.exists() {
            let index = self.load_index(&index_route)?;
            self.cache.put(index_route.path().to_path_buf(), Arc::new(index));
        } else {
            self.cache.invalidate(index_route.path());
        }
        Ok(())
    }

    // ---------------------------------------------------------------
    // Entry routes
    // ---------------------------------------------------------------

    /// [`FileDictionary::route`] with a custom entry filename formatter.
    ///
    /// The formatter only applies when a new entry is allocated; existing
    /// entries keep their name.
    /// A name that cannot be stored in the bucket index is rejected with
    /// [`IndexError::InvalidIdentifier`](fsdict_index::IndexError) and nothing
    /// is written.
    pub fn route_with<F: Fn(u64) -> String>(&self, key: &[u8], filename: F) -> StoreResult<Route> {
        let bucket = self.bucket(key);
        let index_route = bucket.join(INDEX_FILE);
        if !index_route.exists() {
            index_route.init(NodeKind::File)?;
        }

        let mut index = self.load_index(&index_route)?;
        let entry = index.allocate_one(key, filename)?;
        self.persist_index(&index_route, index)?;

        Ok(bucket.join(entry))
    }

    /// Allocate routes for many keys.
    pub fn allocate<I, K>(&self, keys: I) -> StoreResult<BTreeMap<Vec<u8>, Route>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
    {
        self.allocate_with(keys, decimal)
    }

    /// Allocate routes for many keys with a custom filename formatter.
    ///
    /// Every returned route has a committed index entry and an existing,
    /// possibly empty, file.
    pub fn allocate_with<I, K, F>(&self, keys: I, filename: F) -> StoreResult<BTreeMap<Vec<u8>, Route>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
        F: Fn(u64) -> String,
    {
        let mut routes = BTreeMap::new();
        for key in keys {
            let key = key.as_ref();
            let route = self.route_with(key, &filename)?;
            if !route.exists() {
                route.init(NodeKind::File)?;
            }
            routes.insert(key.to_vec(), route);
        }
        Ok(routes)
    }

    // ---------------------------------------------------------------
    // Enumeration
    // ---------------------------------------------------------------

    /// Every `(key, entry route)` pair, walking the tree breadth-first.
    ///
    /// Restartable: each call begins a new walk.
    pub fn references(&self) -> References<'_> {
        References::new(self)
    }

    /// Every key in the dictionary.
    ///
    /// Keys come from the bucket indexes without checking the entry files.
    pub fn keys(&self) -> impl Iterator<Item = StoreResult<Vec<u8>>> + '_ {
        self.references().map(|item| item.map(|(key, _)| key))
    }

    /// The value of every key.
    ///
    /// Loads each entry file whole; meant for stores of small values.
    pub fn values(&self) -> impl Iterator<Item = StoreResult<Vec<u8>>> + '_ {
        self.references().map(|item| {
            let (key, route) = item?;
            match route.load() {
                Ok(value) => Ok(value),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::EntryMissing {
                    key,
                    entry: route.path().to_path_buf(),
                }),
                Err(e) => Err(e.into()),
            }
        })
    }

    /// Number of keys. Always `Unsupported`: counting would mean walking
    /// every bucket; use [`Dictionary::keys`].
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> StoreResult<usize> {
        Err(StoreError::Unsupported("len"))
    }

    /// Bytes used by all files of the dictionary.
    pub fn usage(&self) -> StoreResult<u64> {
        Ok(self.directory.usage()?)
    }

    // ---------------------------------------------------------------
    // Nesting
    // ---------------------------------------------------------------

    /// A dictionary nested at the route of `key`.
    ///
    /// An existing sub-dictionary is opened with its own recorded
    /// addressing. Otherwise one is created with `addressing`, or this
    /// dictionary's addressing if `None`. Options are inherited.
    pub fn subdictionary(&self, key: &[u8], addressing: Option<Hash>) -> StoreResult<Dictionary> {
        let route = self.route(key)?;
        if !route.exists() {
            route.init(NodeKind::Directory)?;
        }
        let sub = if route.join(HASH_FILE).exists() {
            Self::open(route.path())?
        } else {
            Self::create(addressing.unwrap_or(self.addressing), route.path())?
        };
        Ok(sub.with_options(self.options))
    }

    /// Merge `source` into this dictionary. Not supported.
    pub fn merge(&self, _source: &Dictionary) -> StoreResult<()> {
        Err(StoreError::Unsupported("merge"))
    }
}

impl FileDictionary for Dictionary {
    fn has_key(&self, key: &[u8]) -> StoreResult<bool> {
        let bucket = self.bucket(key);
        let index_route = bucket.join(INDEX_FILE);
        if !index_route.exists() {
            return Ok(false);
        }

        let index = self.cached_index(&index_route)?;
        Ok(index
            .get(key)
            .is_some_and(|entry| bucket.join(entry).exists()))
    }

    fn route(&self, key: &[u8]) -> StoreResult<Route> {
        self.route_with(key, decimal)
    }

    fn set(&self, key: &[u8], value: &[u8]) -> StoreResult<()> {
        let route = self.route(key)?;
        let mut file = route.open(Mode::Write)?;
        file.write_all(value)?;
        Ok(())
    }

    fn try_get(&self, key: &[u8]) -> StoreResult<Option<Vec<u8>>> {
        if !self.has_key(key)? {
            return Ok(None);
        }
        Ok(Some(self.route(key)?.load()?))
    }

    fn delete(&self, key: &[u8]) -> StoreResult<()> {
        let bucket = self.bucket(key);
        let index_route = bucket.join(INDEX_FILE);
        if !index_route.exists() {
            return Err(StoreError::key_not_found(key));
        }

        let mut index = self.load_index(&index_route)?;
        if !index.has_key(key) {
            return Err(StoreError::key_not_found(key));
        }
        let entry = index.delete(key)?;
        self.persist_index(&index_route, index)?;

        // The index change stays committed even if the file is gone.
        let entry_route = bucket.join(&entry);
        if !entry_route.exists() {
            warn!(path = %entry_route, "entry file missing on delete");
            return Err(StoreError::EntryMissing {
                key: key.to_vec(),
                entry: entry_route.path().to_path_buf(),
            });
        }
        entry_route.void()?;
        debug!(path = %entry_route, "entry deleted");
        Ok(())
    }

    fn clear(&self) -> StoreResult<()> {
        self.directory.void()?;
        Self::initialize(&self.addressing, &self.directory)?;
        self.cache.clear();
        debug!(path = %self.directory, "dictionary cleared");
        Ok(())
    }
}
