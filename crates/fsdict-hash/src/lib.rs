//! Key addressing for fsdict.
//!
//! A key is run through a digest function, rendered as lower-case hex, and
//! the hex string is divided into `depth` fixed-width segments. The segments
//! name the nested shard directories that lead to a key's bucket.
//!
//! # Key Types
//!
//! - [`Hash`] -- A configured addressing scheme (algorithm, depth, length)
//! - [`Algorithm`] -- The digest functions a store may be configured with
//! - [`Fnv1a64`] -- The default, non-cryptographic 64-bit FNV-1a hasher
//!
//! Addressing is deterministic: the same key under the same configuration
//! always yields the same segments. Stores depend on this to find their data
//! again, so neither the algorithms nor the division may change behavior.

pub mod algorithm;
pub mod error;
pub mod fnv;
pub mod hash;

pub use algorithm::Algorithm;
pub use error::{HashError, HashResult};
pub use fnv::Fnv1a64;
pub use hash::Hash;
