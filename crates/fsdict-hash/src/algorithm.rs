use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::Digest;

use crate::error::HashError;
use crate::fnv::Fnv1a64;

/// Digest functions available for key addressing.
///
/// The names are the ones written to a store's `hash` record and must never
/// change once published. Besides FNV-1a and BLAKE3 they follow the common
/// digest naming (`sha256`, `sha3_256`, `blake2b`, ...), so stores recorded
/// under any of those names open here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    /// 64-bit FNV-1a (non-cryptographic, the default).
    #[default]
    #[serde(rename = "fnv1a_64")]
    Fnv1a64,
    #[serde(rename = "md5")]
    Md5,
    #[serde(rename = "sha1")]
    Sha1,
    #[serde(rename = "sha224")]
    Sha224,
    #[serde(rename = "sha256")]
    Sha256,
    #[serde(rename = "sha384")]
    Sha384,
    #[serde(rename = "sha512")]
    Sha512,
    #[serde(rename = "sha3_224")]
    Sha3_224,
    #[serde(rename = "sha3_256")]
    Sha3_256,
    #[serde(rename = "sha3_384")]
    Sha3_384,
    #[serde(rename = "sha3_512")]
    Sha3_512,
    /// BLAKE2b with its full 64-byte output.
    #[serde(rename = "blake2b")]
    Blake2b,
    /// BLAKE2s with its full 32-byte output.
    #[serde(rename = "blake2s")]
    Blake2s,
    #[serde(rename = "blake3")]
    Blake3,
}

impl Algorithm {
    /// Every supported algorithm.
    pub const ALL: [Algorithm; 14] = [
        Algorithm::Fnv1a64,
        Algorithm::Md5,
        Algorithm::Sha1,
        Algorithm::Sha224,
        Algorithm::Sha256,
        Algorithm::Sha384,
        Algorithm::Sha512,
        Algorithm::Sha3_224,
        Algorithm::Sha3_256,
        Algorithm::Sha3_384,
        Algorithm::Sha3_512,
        Algorithm::Blake2b,
        Algorithm::Blake2s,
        Algorithm::Blake3,
    ];

    /// The persisted name of the algorithm.
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Fnv1a64 => "fnv1a_64",
            Algorithm::Md5 => "md5",
            Algorithm::Sha1 => "sha1",
            Algorithm::Sha224 => "sha224",
            Algorithm::Sha256 => "sha256",
            Algorithm::Sha384 => "sha384",
            Algorithm::Sha512 => "sha512",
            Algorithm::Sha3_224 => "sha3_224",
            Algorithm::Sha3_256 => "sha3_256",
            Algorithm::Sha3_384 => "sha3_384",
            Algorithm::Sha3_512 => "sha3_512",
            Algorithm::Blake2b => "blake2b",
            Algorithm::Blake2s => "blake2s",
            Algorithm::Blake3 => "blake3",
        }
    }

    /// Number of hex characters in a full digest.
    pub fn natural_length(&self) -> usize {
        match self {
            Algorithm::Fnv1a64 => 16,
            Algorithm::Md5 => 32,
            Algorithm::Sha1 => 40,
            Algorithm::Sha224 | Algorithm::Sha3_224 => 56,
            Algorithm::Sha256 | Algorithm::Sha3_256 | Algorithm::Blake2s | Algorithm::Blake3 => 64,
            Algorithm::Sha384 | Algorithm::Sha3_384 => 96,
            Algorithm::Sha512 | Algorithm::Sha3_512 | Algorithm::Blake2b => 128,
        }
    }

    /// Digest `data` and render it as lower-case hex.
    pub fn hexdigest(&self, data: &[u8]) -> String {
        match self {
            Algorithm::Fnv1a64 => Fnv1a64::compute(data).hexdigest(),
            Algorithm::Md5 => hex::encode(md5::Md5::digest(data)),
            Algorithm::Sha1 => hex::encode(sha1::Sha1::digest(data)),
            Algorithm::Sha224 => hex::encode(sha2::Sha224::digest(data)),
            Algorithm::Sha256 => hex::encode(sha2::Sha256::digest(data)),
            Algorithm::Sha384 => hex::encode(sha2::Sha384::digest(data)),
            Algorithm::Sha512 => hex::encode(sha2::Sha512::digest(data)),
            Algorithm::Sha3_224 => hex::encode(sha3::Sha3_224::digest(data)),
            Algorithm::Sha3_256 => hex::encode(sha3::Sha3_256::digest(data)),
            Algorithm::Sha3_384 => hex::encode(sha3::Sha3_384::digest(data)),
            Algorithm::Sha3_512 => hex::encode(sha3::Sha3_512::digest(data)),
            Algorithm::Blake2b => hex::encode(blake2::Blake2b512::digest(data)),
            Algorithm::Blake2s => hex::encode(blake2::Blake2s256::digest(data)),
            Algorithm::Blake3 => blake3::hash(data).to_hex().to_string(),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| HashError::UnknownAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_roundtrip_through_from_str() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.name().parse::<Algorithm>().unwrap(), algorithm);
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        let err = "md4".parse::<Algorithm>().unwrap_err();
        assert_eq!(err, HashError::UnknownAlgorithm("md4".into()));
    }

    #[test]
    fn digest_lengths_match_natural_length() {
        for algorithm in Algorithm::ALL {
            let digest = algorithm.hexdigest(b"some key");
            assert_eq!(digest.len(), algorithm.natural_length(), "{algorithm}");
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn sha256_known_vector() {
        assert_eq!(
            Algorithm::Sha256.hexdigest(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn legacy_digest_known_vectors() {
        assert_eq!(Algorithm::Md5.hexdigest(b"abc"), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            Algorithm::Sha1.hexdigest(b"abc"),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            Algorithm::Sha3_256.hexdigest(b"abc"),
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        );
    }

    #[test]
    fn common_digest_names_parse() {
        for name in ["md5", "sha1", "sha3_224", "sha3_256", "sha3_384", "sha3_512", "blake2b", "blake2s"] {
            assert_eq!(name.parse::<Algorithm>().unwrap().name(), name);
        }
        assert!("sha3-256".parse::<Algorithm>().is_err());
    }

    #[test]
    fn default_is_fnv() {
        assert_eq!(Algorithm::default(), Algorithm::Fnv1a64);
    }

    #[test]
    fn serde_uses_persisted_names() {
        let json = serde_json::to_string(&Algorithm::Fnv1a64).unwrap();
        assert_eq!(json, "\"fnv1a_64\"");
        let back: Algorithm = serde_json::from_str("\"sha512\"").unwrap();
        assert_eq!(back, Algorithm::Sha512);
        for algorithm in Algorithm::ALL {
            let json = serde_json::to_string(&algorithm).unwrap();
            assert_eq!(json, format!("\"{}\"", algorithm.name()));
        }
    }
}
