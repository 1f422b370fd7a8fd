//! The in-memory table for one bucket.

use std::collections::BTreeMap;
use std::io::{self, Write};

use tracing::trace;

use crate::error::{IndexError, IndexResult};
use crate::format;

/// Default entry filename formatter: the identifier as a decimal string.
pub fn decimal(n: u64) -> String {
    n.to_string()
}

/// A bucket index: key to entry identifier, plus the allocation counter.
///
/// `counter` is the high-water mark of assigned identifiers. It only moves
/// forward; identifiers freed by [`Index::delete`] are never handed out
/// again.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Index {
    counter: u64,
    entries: BTreeMap<Vec<u8>, String>,
}

impl Index {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole index file.
    pub fn from_bytes(data: &[u8]) -> IndexResult<Self> {
        let mut index = Self::new();
        index.load_bytes(data)?;
        Ok(index)
    }

    /// The allocation counter.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the index has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `key` has an entry.
    pub fn has_key(&self, key: &[u8]) -> bool {
        self.entries.contains_key(key)
    }

    /// The entry identifier of `key`.
    pub fn get(&self, key: &[u8]) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Keys in the index.
    pub fn keys(&self) -> impl Iterator<Item = &[u8]> {
        self.entries.keys().map(Vec::as_slice)
    }

    /// `(key, identifier)` pairs in the index.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_slice(), v.as_str()))
    }

    // ---------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------

    /// Replace the index contents with the parsed `lines`.
    ///
    /// Each line must include its trailing terminator. No lines at all is
    /// an empty index with a zero counter. Records with a blank identifier
    /// line are skipped. On error the index is left unchanged.
    pub fn load<I, L>(&mut self, lines: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = L>,
        L: AsRef<[u8]>,
    {
        let mut records = format::structure(lines).into_iter();

        let counter = match records.next() {
            None => 0,
            Some(first) => parse_counter(&first.identifier)?,
        };

        let mut entries = BTreeMap::new();
        for record in records {
            if record.identifier.is_empty() {
                continue;
            }
            let identifier = String::from_utf8(record.identifier)
                .map_err(|e| IndexError::InvalidIdentifier(e.into_bytes()))?;
            entries.insert(record.key, identifier);
        }

        self.counter = counter;
        self.entries = entries;
        Ok(())
    }

    /// Replace the index contents with the parsed file contents.
    pub fn load_bytes(&mut self, data: &[u8]) -> IndexResult<()> {
        self.load(format::split_lines(data))
    }

    /// Serialize the index to `w`.
    ///
    /// Entry order in the output carries no meaning.
    pub fn store<W: Write>(&self, w: &mut W) -> io::Result<()> {
        format::write_counter(w, self.counter)?;
        for (key, identifier) in &self.entries {
            format::write_record(w, identifier, key)?;
        }
        Ok(())
    }

    /// Serialize the index into a buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.store(&mut out);
        out
    }

    // ---------------------------------------------------------------
    // Entry allocation
    // ---------------------------------------------------------------

    /// Resolve an identifier for each key, in input order.
    ///
    /// Keys already present keep their identifier. Each new key advances the
    /// counter and receives `filename(counter)`. Stops at the first key that
    /// cannot be allocated; keys before it stay allocated.
    pub fn allocate<I, K, F>(&mut self, keys: I, filename: F) -> IndexResult<Vec<String>>
    where
        I: IntoIterator<Item = K>,
        K: AsRef<[u8]>,
        F: Fn(u64) -> String,
    {
        keys.into_iter()
            .map(|key| self.resolve(key.as_ref(), &filename))
            .collect()
    }

    /// Single-key form of [`Index::allocate`].
    pub fn allocate_one<F: Fn(u64) -> String>(&mut self, key: &[u8], filename: F) -> IndexResult<String> {
        self.resolve(key, &filename)
    }

    fn resolve<F: Fn(u64) -> String>(&mut self, key: &[u8], filename: &F) -> IndexResult<String> {
        match self.entries.get(key) {
            Some(identifier) => Ok(identifier.clone()),
            None => self.insert(key, filename),
        }
    }

    fn insert<F: Fn(u64) -> String>(&mut self, key: &[u8], filename: &F) -> IndexResult<String> {
        let counter = self
            .counter
            .checked_add(1)
            .ok_or(IndexError::CounterExhausted)?;
        let identifier = filename(counter);
        check_identifier(&identifier)?;

        self.counter = counter;
        trace!(counter, identifier = %identifier, "index entry allocated");
        self.entries.insert(key.to_vec(), identifier.clone());
        Ok(identifier)
    }

    /// Remove `key`, returning the identifier of its (now orphaned) entry.
    pub fn delete(&mut self, key: &[u8]) -> IndexResult<String> {
        self.entries
            .remove(key)
            .ok_or_else(|| IndexError::KeyNotFound(key.to_vec()))
    }
}

/// An identifier must survive a store/load cycle and name a file inside the
/// bucket.
fn check_identifier(identifier: &str) -> IndexResult<()> {
    let unusable = identifier.trim().is_empty()
        || identifier.starts_with(format::TAB as char)
        || identifier.contains(['\n', '\r', '/'])
        || identifier == "."
        || identifier == "..";
    if unusable {
        return Err(IndexError::InvalidIdentifier(identifier.as_bytes().to_vec()));
    }
    Ok(())
}

fn parse_counter(line: &[u8]) -> IndexResult<u64> {
    std::str::from_utf8(line)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .ok_or_else(|| IndexError::MalformedCounter(String::from_utf8_lossy(line).into_owned()))
}
