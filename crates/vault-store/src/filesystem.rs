//! Filesystem-backed chunk store
//!
//! Each chunk is one file under the base directory, named by the lowercase
//! hex encoding of the chunk name. Mutations are serialized through a
//! process-local lock so that `compare_and_swap` is atomic with respect to
//! every other mutation made through the same handle.

use crate::error::{Result, StoreError};
use crate::traits::{ChunkStore, StoreStats};
use parking_lot::Mutex;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CHUNK_EXTENSION: &str = "chunk";

/// Filesystem chunk store
#[derive(Debug)]
pub struct FilesystemChunkStore {
    base_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FilesystemChunkStore {
    /// Open (creating if needed) a store rooted at `base_path`
    pub fn open(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        tracing::debug!(path = %base_path.display(), "Opened filesystem chunk store");
        Ok(Self {
            base_path,
            write_lock: Mutex::new(()),
        })
    }

    /// Root directory of this store
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    fn chunk_path(&self, name: &[u8]) -> Result<PathBuf> {
        if name.is_empty() {
            return Err(StoreError::InvalidKey {
                reason: "Chunk name cannot be empty".to_string(),
            });
        }
        Ok(self
            .base_path
            .join(format!("{}.{CHUNK_EXTENSION}", hex::encode(name))))
    }

    fn read(path: &Path) -> Result<Option<Vec<u8>>> {
        match fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    // Write to a sibling temp file then rename, so readers never observe a
    // partially written chunk.
    fn write_atomically(path: &Path, value: &[u8]) -> Result<()> {
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl ChunkStore for FilesystemChunkStore {
    fn has(&self, name: &[u8]) -> Result<bool> {
        Ok(self.chunk_path(name)?.exists())
    }

    fn get(&self, name: &[u8]) -> Result<Option<Vec<u8>>> {
        Self::read(&self.chunk_path(name)?)
    }

    fn store(&self, name: &[u8], value: Vec<u8>) -> Result<()> {
        let path = self.chunk_path(name)?;
        let _guard = self.write_lock.lock();
        if path.exists() {
            return Err(StoreError::already_exists(name));
        }
        Self::write_atomically(&path, &value)
    }

    fn modify(&self, name: &[u8], value: Vec<u8>) -> Result<()> {
        let path = self.chunk_path(name)?;
        let _guard = self.write_lock.lock();
        if !path.exists() {
            return Err(StoreError::not_found(name));
        }
        Self::write_atomically(&path, &value)
    }

    fn delete(&self, name: &[u8]) -> Result<()> {
        let path = self.chunk_path(name)?;
        let _guard = self.write_lock.lock();
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::not_found(name)),
            Err(e) => Err(e.into()),
        }
    }

    fn compare_and_swap(&self, name: &[u8], expected: &[u8], new: Vec<u8>) -> Result<bool> {
        let path = self.chunk_path(name)?;
        let _guard = self.write_lock.lock();
        match Self::read(&path)? {
            Some(current) if current == expected => {
                Self::write_atomically(&path, &new)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn stats(&self) -> Result<StoreStats> {
        let mut key_count = 0u64;
        let mut total_size = 0u64;
        for entry in fs::read_dir(&self.base_path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(CHUNK_EXTENSION) {
                continue;
            }
            key_count += 1;
            total_size += entry.metadata()?.len();
        }
        Ok(StoreStats {
            key_count,
            total_size,
            backend_type: "filesystem".to_string(),
        })
    }
}
