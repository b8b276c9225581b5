//! Data models for the client
//!
//! Wire DTOs for the remote API and the client-side session record.

mod file;
mod user;

// Re-export all models for convenient imports
pub use file::*;
pub use user::*;
