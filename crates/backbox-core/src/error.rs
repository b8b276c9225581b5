//! Error types module
//!
//! All client failures are unified under [`AppError`]. The `Display` output of every
//! variant is the message shown inline in the view that triggered the failure, so
//! callers can surface `err.to_string()` directly.
//!
//! Local checks live in [`ValidationError`]; they are raised before any network
//! call is made.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected failures such as validation errors
    Debug,
    /// Server rejections and session expiry
    Warn,
    /// Unexpected failures
    Error,
}

/// Local validation failures. None of these ever reach the network.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Please enter your email")]
    MissingEmail,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error("Password must be at least {min} characters long")]
    PasswordTooShort { min: usize },

    #[error("Please enter the OTP")]
    MissingOtp,

    #[error("OTP must be 6 digits")]
    IncompleteOtp,

    #[error("Resend OTP in {remaining}s")]
    ResendTooSoon { remaining: u32 },

    #[error("Please choose a file first.")]
    NoFileSelected,

    #[error("You need to sign in again before uploading.")]
    MissingToken,
}

/// Known categories of server-side rejection, recognised from the message body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionCategory {
    AccountNotFound,
    InvalidCredentials,
    /// Anything else; the server message is passed through verbatim.
    Other,
}

impl RejectionCategory {
    /// Fixed user-facing message for recognised categories.
    pub fn fixed_message(&self) -> Option<&'static str> {
        match self {
            RejectionCategory::AccountNotFound => {
                Some("No account found with this email. Please sign up first.")
            }
            RejectionCategory::InvalidCredentials => Some("Incorrect password. Please try again."),
            RejectionCategory::Other => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{message}")]
    Rejected {
        status: u16,
        category: RejectionCategory,
        message: String,
    },

    #[error("Cannot connect to server. Please check if the backend is running.")]
    Unreachable,

    #[error("Your session has expired. Please sign in again.")]
    SessionExpired,

    #[error("Please sign in to continue.")]
    SignInRequired,

    #[error("{0}")]
    FetchFailed(String),

    #[error("{0}")]
    DeleteFailed(String),

    #[error("{0}")]
    Upload(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Config error: {0}")]
    Config(String),

    /// Detail is kept for logs; users only see the generic message.
    #[error("An unexpected error occurred. Please try again.")]
    Unexpected(String),
}

impl AppError {
    /// Message shown inline in the view that triggered the failure.
    pub fn user_message(&self) -> String {
        self.to_string()
    }

    /// Whether the failure is fatal to the session and the caller must go back to login.
    pub fn redirect_to_login(&self) -> bool {
        matches!(self, AppError::SessionExpired | AppError::SignInRequired)
    }

    pub fn log_level(&self) -> LogLevel {
        match self {
            AppError::Validation(_) | AppError::SignInRequired => LogLevel::Debug,
            AppError::Rejected { .. }
            | AppError::SessionExpired
            | AppError::Unreachable
            | AppError::FetchFailed(_)
            | AppError::DeleteFailed(_)
            | AppError::Upload(_) => LogLevel::Warn,
            AppError::Storage(_) | AppError::Config(_) | AppError::Unexpected(_) => {
                LogLevel::Error
            }
        }
    }

    /// Emit the error through `tracing` at its own level.
    pub fn log(&self, operation: &str) {
        match self.log_level() {
            LogLevel::Debug => tracing::debug!(operation, error = %self, "Operation rejected locally"),
            LogLevel::Warn => tracing::warn!(operation, error = %self, "Operation failed"),
            LogLevel::Error => tracing::error!(operation, error = ?self, "Operation failed"),
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Storage(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("Serialization error: {}", err))
    }
}
