//! Session persistence for the Atrium console.
//!
//! This crate provides:
//! - A `KeyValueStore` trait for flat string-keyed backends
//! - In-memory and JSON-file backends
//! - A high-level `SessionStore` over the persisted tenant + credential
//!   context, with an idempotent clear used by every termination path

mod file;
mod keys;
mod memory;
mod store;
mod traits;

pub use file::FileStore;
pub use keys::SessionKeys;
pub use memory::MemoryStore;
pub use store::{Session, SessionStore};
pub use traits::KeyValueStore;

use std::path::PathBuf;
use thiserror::Error;

/// Error type for storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific storage error
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Encoding/decoding error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Default location of the on-disk session file (`~/.atrium/session.json`).
pub fn default_store_path() -> StorageResult<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| StorageError::Backend("Could not determine home directory".to_string()))?;
    Ok(home.join(".atrium").join("session.json"))
}

/// Create a `SessionStore` over the default file-backed storage.
pub fn create_store() -> StorageResult<SessionStore> {
    let store = FileStore::open(default_store_path()?)?;
    Ok(SessionStore::new(Box::new(store)))
}
