//! Bucket index for fsdict.
//!
//! Every bucket directory holds an `index` file mapping the keys stored in
//! that bucket to the names of their entry files, plus a counter used to
//! assign new entry names.
//!
//! # Key Types
//!
//! - [`Index`] -- The in-memory table for one bucket (BTreeMap-backed)
//! - [`format`] -- Parsing and rendering of the indented text format
//!
//! The index never touches the file system itself; the store reads the file,
//! hands the bytes to [`Index::load_bytes`], and writes back whatever
//! [`Index::store`] produces.

pub mod error;
pub mod format;
pub mod index;

pub use error::{IndexError, IndexResult};
pub use index::{decimal, Index};
