use core::{fmt::Display, str::FromStr};

use blake3::Hasher;
use hex::encode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of hex characters in a rendered digest (BLAKE3 output is 32 bytes).
pub const DIGEST_HEX_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum DigestParseError {
    #[error("digest must be {DIGEST_HEX_LEN} characters long, got {0}")]
    BadLength(usize),
    #[error("digest must be lowercase hex")]
    NotHex,
}

/// Content-addressing key: the BLAKE3 hash of a file's bytes, as lowercase hex.
///
/// Uses [`blake3`] crate to compute the hash value.
#[derive(
    Debug, Clone, PartialEq, Eq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Computes the digest of the given bytes.
    ///
    /// Deterministic for any input, including the empty one.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        log::debug!("Computing BLAKE3 hash for {} bytes", bytes.len());

        let mut hasher = Hasher::new();
        hasher.update(bytes);
        let hash = hasher.finalize();
        ContentDigest(encode(hash.as_bytes()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ContentDigest {
    type Err = DigestParseError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        if s.len() != DIGEST_HEX_LEN {
            return Err(DigestParseError::BadLength(s.len()));
        }
        if !s
            .bytes()
            .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        {
            return Err(DigestParseError::NotHex);
        }
        Ok(ContentDigest(s.to_owned()))
    }
}

impl Display for ContentDigest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
