//! Hash-sharded, file-backed key/value store.
//!
//! Values are stored as ordinary files. A key is hashed, the digest is
//! divided into path segments, and the segments select a bucket directory
//! under the store root. Each bucket keeps an `index` file mapping its keys
//! to entry file names, so millions of values never end up in one directory.
//!
//! ```text
//! <root>/
//!   hash                        "<algorithm> <depth> <digest-length>\n"
//!   <segment 1>/.../<segment depth>/
//!     index                     bucket index (see fsdict-index)
//!     <identifier>              raw value bytes
//! ```
//!
//! # Key Types
//!
//! - [`Dictionary`] -- A store rooted at one directory
//! - [`FileDictionary`] -- The per-key operations of a store
//! - [`Route`] -- A path with the file-system operations the store needs
//! - [`DictionaryOptions`] -- Runtime tuning (index cache capacity)
//!
//! # Concurrency
//!
//! There is no locking. Two writers touching the same bucket can lose an
//! update (the last full index rewrite wins). Callers that share a store
//! between threads or processes must serialize writes per bucket themselves,
//! and can use [`Dictionary::refresh`] to re-read an index they suspect was
//! changed behind their back.

mod cache;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod route;
pub mod traits;
pub mod walk;

pub use config::DictionaryOptions;
pub use dictionary::{Dictionary, HASH_FILE, INDEX_FILE};
pub use error::{StoreError, StoreResult};
pub use route::{Mode, NodeKind, Route};
pub use traits::FileDictionary;
pub use walk::References;

pub use fsdict_hash::{Algorithm, Hash};
pub use fsdict_index::{decimal, Index};
