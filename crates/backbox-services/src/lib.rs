//! BackBox client services
//!
//! The state machines behind each screen of the client, independent of how they
//! are rendered:
//!
//! - [`auth`]: password login, signup, OTP request/verify, logout
//! - [`otp`]: two-step OTP flow, six-cell code editor, resend cooldown
//! - [`upload`]: single-file upload with a minimum busy duration
//! - [`files`]: file dashboard view-model (list, search, stats, delete, download)
//!
//! Every service reads the bearer token from the shared
//! [`SessionStore`](backbox_storage::SessionStore); only [`auth::AuthService`]
//! writes to it, except for clearing it when the API answers 401.

pub mod auth;
pub mod files;
pub mod navigation;
pub mod otp;
pub mod status;
pub mod upload;

#[cfg(test)]
pub mod test_helpers;

pub use auth::{AuthService, AuthSuccess, SignupSuccess};
pub use files::{DownloadOutcome, FileListViewModel, FileStats, RemoveOutcome};
pub use navigation::{Redirect, Route};
pub use otp::{OtpEditor, OtpFlow, OtpKey, OtpStep, ResendCooldown};
pub use status::Status;
pub use upload::{SelectedFile, UploadState, Uploader};
