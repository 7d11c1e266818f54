//! In-memory chunk store

use crate::error::{Result, StoreError};
use crate::traits::{ChunkStore, StoreStats};
use parking_lot::RwLock;
use std::collections::HashMap;

/// In-memory chunk store.
///
/// A single lock guards the whole map, which makes every operation,
/// including `compare_and_swap`, atomic per name.
#[derive(Debug, Default)]
pub struct MemoryChunkStore {
    data: RwLock<HashMap<Vec<u8>, Vec<u8>>>,
}

impl MemoryChunkStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl ChunkStore for MemoryChunkStore {
    fn has(&self, name: &[u8]) -> Result<bool> {
        Ok(self.data.read().contains_key(name))
    }

    fn get(&self, name: &[u8]) -> Result<Option<Vec<u8>>> {
        Ok(self.data.read().get(name).cloned())
    }

    fn store(&self, name: &[u8], value: Vec<u8>) -> Result<()> {
        let mut data = self.data.write();
        if data.contains_key(name) {
            return Err(StoreError::already_exists(name));
        }
        data.insert(name.to_vec(), value);
        Ok(())
    }

    fn modify(&self, name: &[u8], value: Vec<u8>) -> Result<()> {
        match self.data.write().get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(StoreError::not_found(name)),
        }
    }

    fn delete(&self, name: &[u8]) -> Result<()> {
        self.data
            .write()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found(name))
    }

    fn compare_and_swap(&self, name: &[u8], expected: &[u8], new: Vec<u8>) -> Result<bool> {
        let mut data = self.data.write();
        match data.get_mut(name) {
            Some(slot) if slot.as_slice() == expected => {
                *slot = new;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn stats(&self) -> Result<StoreStats> {
        let data = self.data.read();
        Ok(StoreStats {
            key_count: data.len() as u64,
            total_size: data.values().map(|v| v.len() as u64).sum(),
            backend_type: "memory".to_string(),
        })
    }
}
