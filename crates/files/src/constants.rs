/// Buffer size used when streaming a reader through the hasher.
pub const READ_BUFFER_SIZE: usize = 8192;

/// Prefix of the scratch files written next to their final destination before rename.
pub(crate) const PARTIAL_FILE_PREFIX: &str = ".partial-";
