//! BackBox Storage Library
//!
//! This crate provides the persisted key/value storage that holds the client
//! session, plus the [`SessionStore`] that owns the session lifecycle on top of it.
//!
//! # Keys
//!
//! Exactly two keys are used, always written and cleared together:
//!
//! - `token`: the bearer token string
//! - `user`: the JSON-serialized user record

#[cfg(feature = "storage-local")]
pub mod local;
pub mod memory;
pub mod session_store;
pub mod traits;

// Re-export commonly used types
#[cfg(feature = "storage-local")]
pub use local::LocalSessionBackend;
pub use memory::MemorySessionBackend;
pub use session_store::{SessionEvent, SessionStore, TOKEN_KEY, USER_KEY};
pub use traits::{SessionBackend, StorageError, StorageResult};
