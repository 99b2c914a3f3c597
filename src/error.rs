use thiserror::Error;

/// Errors reported by the table and its map and set views.
///
/// Neither kind is retryable: every operation is deterministic given the
/// table's state.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A strict accessor (`try_get`, `remove`, indexing) was given a key that
    /// is not present.
    #[error("key not found")]
    KeyNotFound,

    /// A probe visited every slot without finding an empty slot, a tombstone,
    /// or a matching key.
    ///
    /// The load factor bound makes this unreachable unless the table's
    /// bookkeeping has been corrupted. Treat it as fatal.
    #[error("probe exhausted all {capacity} slots with {len} entries recorded")]
    ConsistencyViolation {
        /// Number of slots in the backing array.
        capacity: usize,
        /// Number of live entries the table believed it held.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found");
        assert_eq!(
            Error::ConsistencyViolation {
                capacity: 8,
                len: 0
            }
            .to_string(),
            "probe exhausted all 8 slots with 0 entries recorded"
        );
    }
}
