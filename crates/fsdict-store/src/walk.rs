//! Breadth-first enumeration of a dictionary's buckets.
//!
//! A directory containing an `index` file is a bucket; every other
//! directory is an intermediate shard level and is descended into. The walk
//! never consults the configured depth, so it also works on stores whose
//! buckets sit at different depths.

use std::collections::VecDeque;

use crate::dictionary::{Dictionary, INDEX_FILE};
use crate::error::StoreResult;
use crate::route::Route;

/// Lazy iterator over `(key, entry route)` pairs of a dictionary.
///
/// Entries come straight from the bucket indexes; their files are not
/// checked, so keys whose backing file is missing are still reported.
#[derive(Debug)]
pub struct References<'a> {
    dictionary: &'a Dictionary,
    queue: VecDeque<Route>,
    pending: std::vec::IntoIter<(Vec<u8>, Route)>,
}

impl<'a> References<'a> {
    pub(crate) fn new(dictionary: &'a Dictionary) -> Self {
        Self {
            dictionary,
            queue: VecDeque::from([dictionary.directory().clone()]),
            pending: Vec::new().into_iter(),
        }
    }

    /// Read one directory level, queueing shard directories and collecting
    /// the entries of buckets.
    fn descend(&mut self, directory: &Route) -> StoreResult<()> {
        let (directories, _files) = directory.subnodes()?;
        let mut found = Vec::new();
        for child in directories {
            let index_route = child.join(INDEX_FILE);
            if index_route.exists() {
                let index = self.dictionary.cached_index(&index_route)?;
                found.extend(
                    index
                        .iter()
                        .map(|(key, entry)| (key.to_vec(), child.join(entry))),
                );
            } else {
                self.queue.push_back(child);
            }
        }
        self.pending = found.into_iter();
        Ok(())
    }
}

impl Iterator for References<'_> {
    type Item = StoreResult<(Vec<u8>, Route)>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(item) = self.pending.next() {
                return Some(Ok(item));
            }
            let directory = self.queue.pop_front()?;
            if let Err(e) = self.descend(&directory) {
                return Some(Err(e));
            }
        }
    }
}
