/// Runtime options for a [`Dictionary`](crate::Dictionary).
///
/// These are not persisted; the only persisted configuration is the
/// addressing record in the store's `hash` file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DictionaryOptions {
    /// Number of parsed bucket indexes kept in memory (0 disables caching).
    pub cache_capacity: usize,
}

impl DictionaryOptions {
    /// Default index cache capacity.
    pub const DEFAULT_CACHE_CAPACITY: usize = 32;

    /// Options with the index cache disabled; every read goes to disk.
    pub fn uncached() -> Self {
        Self { cache_capacity: 0 }
    }
}

impl Default for DictionaryOptions {
    fn default() -> Self {
        Self {
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
        }
    }
}
