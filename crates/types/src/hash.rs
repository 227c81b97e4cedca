//! Content hash type.

use std::fmt;
use std::str::FromStr;

/// Length of a hex-encoded SHA-256 digest.
const HEX_LEN: usize = 64;

/// Errors produced when parsing a [`ContentHash`].
#[derive(Debug, thiserror::Error)]
pub enum HashError {
    #[error("content hash must be 64 lowercase hex characters, got {0:?}")]
    InvalidFormat(String),
}

/// Hex-encoded SHA-256 digest of a file's byte content.
///
/// Always 64 lowercase hexadecimal characters. Two uploads with identical bytes carry the
/// same `ContentHash` regardless of their filenames, which makes it the primary
/// de-duplication key for documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    /// Builds a hash from raw digest bytes.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        Self(hex::encode(bytes))
    }

    /// Parses an externally supplied digest string.
    ///
    /// Uppercase input is rejected rather than normalised so that stored hashes compare
    /// byte-for-byte.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidFormat`] when `input` is not 64 lowercase hex characters.
    pub fn parse(input: &str) -> Result<Self, HashError> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(HashError::InvalidFormat(input.to_owned()))
    }

    /// Returns true if `input` is a canonical hex SHA-256 digest.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == HEX_LEN
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for ContentHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for ContentHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContentHash::parse(&s).map_err(serde::de::Error::custom)
    }
}
