//! Storage abstraction trait
//!
//! This module defines the SessionBackend trait that all session backends must implement.

use async_trait::async_trait;
use backbox_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Corrupt session file: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err.to_string())
    }
}

/// Persisted string key/value storage, the client-side equivalent of browser
/// local storage.
///
/// Writes are single-writer: callers never hold a value across an await point
/// expecting it to stay fresh.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    /// Read a value; `None` when the key is absent.
    async fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Insert or overwrite a value.
    async fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a value. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> StorageResult<()>;

    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;
}
