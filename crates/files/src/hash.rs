//! Content hasher.
//!
//! Both entry points produce the same [`ContentHash`] for the same bytes, whichever way the
//! bytes arrive.

use crate::READ_BUFFER_SIZE;
use docvault_types::ContentHash;
use sha2::{Digest, Sha256};
use std::io::{self, Read};

/// Compute the SHA-256 hash of a byte slice.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> ContentHash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    finish(hasher)
}

/// Compute the SHA-256 hash of everything a reader yields.
///
/// The reader is consumed to EOF exactly once through a fixed-size buffer. Interrupted reads
/// are retried; any other read error aborts hashing and is returned as is.
pub fn hash_reader<R: Read>(mut reader: R) -> io::Result<ContentHash> {
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; READ_BUFFER_SIZE];

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(finish(hasher))
}

fn finish(hasher: Sha256) -> ContentHash {
    let digest: [u8; 32] = hasher.finalize().into();
    ContentHash::from_bytes(&digest)
}
