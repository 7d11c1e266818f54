use crate::error::Result;

/// Usage statistics for a store backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of chunks held
    pub key_count: u64,
    /// Sum of all chunk sizes in bytes
    pub total_size: u64,
    /// Backend identifier
    pub backend_type: String,
}

/// Content-addressed chunk store.
///
/// Implementations must make each method atomic per name. In particular
/// `compare_and_swap` must never interleave with another mutation of the
/// same name, so that concurrent mailbox appends cannot lose entries.
pub trait ChunkStore: Send + Sync {
    /// Whether a chunk exists under `name`
    fn has(&self, name: &[u8]) -> Result<bool>;

    /// Fetch the chunk stored under `name`, `None` when absent
    fn get(&self, name: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Insert a new chunk. Fails with `AlreadyExists` if `name` is taken.
    fn store(&self, name: &[u8], value: Vec<u8>) -> Result<()>;

    /// Replace an existing chunk. Fails with `NotFound` if `name` is absent.
    fn modify(&self, name: &[u8], value: Vec<u8>) -> Result<()>;

    /// Remove a chunk. Fails with `NotFound` if `name` is absent.
    fn delete(&self, name: &[u8]) -> Result<()>;

    /// Replace the chunk under `name` with `new` only if it currently equals
    /// `expected`.
    ///
    /// Returns `Ok(false)` when the current value differs or the chunk is
    /// absent; the store is left untouched in that case.
    fn compare_and_swap(&self, name: &[u8], expected: &[u8], new: Vec<u8>) -> Result<bool>;

    /// Usage statistics
    fn stats(&self) -> Result<StoreStats>;
}

impl<S: ChunkStore + ?Sized> ChunkStore for std::sync::Arc<S> {
    fn has(&self, name: &[u8]) -> Result<bool> {
        (**self).has(name)
    }

    fn get(&self, name: &[u8]) -> Result<Option<Vec<u8>>> {
        (**self).get(name)
    }

    fn store(&self, name: &[u8], value: Vec<u8>) -> Result<()> {
        (**self).store(name, value)
    }

    fn modify(&self, name: &[u8], value: Vec<u8>) -> Result<()> {
        (**self).modify(name, value)
    }

    fn delete(&self, name: &[u8]) -> Result<()> {
        (**self).delete(name)
    }

    fn compare_and_swap(&self, name: &[u8], expected: &[u8], new: Vec<u8>) -> Result<bool> {
        (**self).compare_and_swap(name, expected, new)
    }

    fn stats(&self) -> Result<StoreStats> {
        (**self).stats()
    }
}
