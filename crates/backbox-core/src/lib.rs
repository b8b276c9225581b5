//! BackBox Core Library
//!
//! This crate provides the domain models, error types, configuration, validation
//! and display helpers shared by every BackBox client component.

pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::ClientConfig;
pub use error::{AppError, RejectionCategory, ValidationError};
pub use models::{FileRecord, Session, User};
