//! # Vault Store - Chunk Persistence
//!
//! **Purpose**: The key/value store that sits behind the chunk authority.
//!
//! Chunks are opaque byte strings keyed by their name. The store does not
//! interpret either; every semantic decision is made by `vault-authority`
//! before a mutation reaches this crate.
//!
//! ## Contract
//!
//! - `store` inserts only if the name is absent
//! - `modify` replaces only if the name is present
//! - `compare_and_swap` is the per-key single-writer primitive used for
//!   mailbox read-modify-write cycles
//!
//! Two implementations are provided: [`MemoryChunkStore`] and
//! [`FilesystemChunkStore`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Store error type
pub mod error;
/// Filesystem-backed store
pub mod filesystem;
/// In-memory store
pub mod memory;
/// The `ChunkStore` trait
pub mod traits;

pub use error::{Result, StoreError};
pub use filesystem::FilesystemChunkStore;
pub use memory::MemoryChunkStore;
pub use traits::{ChunkStore, StoreStats};
