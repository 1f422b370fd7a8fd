//! The divided-digest addressing scheme.
//!
//! A [`Hash`] turns a key into the ordered path segments of its bucket:
//!
//! ```text
//! key --digest--> "85944171f73967e8" --divide(depth = 2)--> ["85944171", "f73967e8"]
//! ```
//!
//! Each segment is `length / depth` characters wide. When `length` is not a
//! multiple of `depth` the trailing remainder of the digest is not used. The
//! address space shrinks accordingly, but existing layouts stay valid, so the
//! behavior is kept.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::algorithm::Algorithm;
use crate::error::{HashError, HashResult};

/// Addressing configuration of a store.
///
/// Written once when a store is created and read back when it is opened;
/// there is no resharding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Hash {
    algorithm: Algorithm,
    depth: usize,
    length: usize,
    #[serde(skip)]
    step: usize,
}

impl Hash {
    /// Default number of path segments.
    pub const DEFAULT_DEPTH: usize = 2;

    /// Build an addressing scheme.
    ///
    /// `length` is the number of hex digest characters used for addressing;
    /// `None` selects the algorithm's full digest.
    pub fn new(algorithm: Algorithm, depth: usize, length: Option<usize>) -> HashResult<Self> {
        let natural = algorithm.natural_length();
        let length = length.unwrap_or(natural);
        if length == 0 || length > natural {
            return Err(HashError::InvalidLength { length, natural });
        }
        if depth == 0 || depth > length {
            return Err(HashError::InvalidDepth { depth, length });
        }

        Ok(Self {
            algorithm,
            depth,
            length,
            step: length / depth,
        })
    }

    /// The digest algorithm.
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Number of path segments per key.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of hex digest characters used for addressing.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Width of each path segment.
    pub fn step(&self) -> usize {
        self.step
    }

    /// The full lower-case hex digest of `key`.
    pub fn digest(&self, key: &[u8]) -> String {
        self.algorithm.hexdigest(key)
    }

    /// The bucket path segments for `key`.
    pub fn compute(&self, key: &[u8]) -> Vec<String> {
        self.divide(&self.digest(key))
    }

    /// Split a hex digest into `depth` segments of `step` characters.
    pub fn divide(&self, digest: &str) -> Vec<String> {
        (0..self.depth)
            .filter_map(|i| digest.get(i * self.step..(i + 1) * self.step))
            .map(str::to_string)
            .collect()
    }

    /// The one-line configuration record, without the line terminator.
    pub fn record(&self) -> String {
        self.to_string()
    }

    /// Parse a configuration record.
    ///
    /// Accepts `"<algorithm> <depth>"`, `"<algorithm> <depth> None"` and
    /// `"<algorithm> <depth> <length>"`; surrounding whitespace is ignored.
    pub fn parse_record(record: &str) -> HashResult<Self> {
        let malformed = || HashError::MalformedRecord(record.to_string());
        let fields: Vec<&str> = record.split_whitespace().collect();

        let (algorithm, depth, length) = match fields.as_slice() {
            [algorithm, depth] => (algorithm, depth, None),
            [algorithm, depth, length] => (algorithm, depth, Some(*length)),
            _ => return Err(malformed()),
        };

        let algorithm: Algorithm = algorithm.parse()?;
        let depth: usize = depth.parse().map_err(|_| malformed())?;
        let length = match length {
            None | Some("None") => None,
            Some(value) => Some(value.parse::<usize>().map_err(|_| malformed())?),
        };

        Self::new(algorithm, depth, length)
    }
}

impl Default for Hash {
    fn default() -> Self {
        let algorithm = Algorithm::Fnv1a64;
        let length = algorithm.natural_length();
        Self {
            algorithm,
            depth: Self::DEFAULT_DEPTH,
            length,
            step: length / Self::DEFAULT_DEPTH,
        }
    }
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.algorithm, self.depth, self.length)
    }
}

impl FromStr for Hash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_record(s)
    }
}
