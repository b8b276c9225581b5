//! Test helpers for service unit tests
//!
//! This module provides a scripted mock of the API traits and fixtures, so the
//! services can be tested without a server.

pub mod fixtures;
pub mod mock_api;

pub use fixtures::*;
pub use mock_api::{MockApi, MockReply};

use backbox_storage::{MemorySessionBackend, SessionStore};
use std::sync::Arc;

/// A session store over a fresh in-memory backend, plus a handle to that backend.
pub fn memory_store() -> (SessionStore, MemorySessionBackend) {
    let backend = MemorySessionBackend::new();
    (SessionStore::new(Arc::new(backend.clone())), backend)
}
