//! Classification of server rejection messages.
//!
//! Each operation has an ordered list of rules. A rule matches when any of its
//! patterns is a case-insensitive substring of the server message; the first
//! matching rule wins. Unmatched messages pass through verbatim, and a missing
//! message falls back to the operation's generic text.

use backbox_api_client::ApiError;
use backbox_core::{AppError, RejectionCategory};

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Lowercase substrings.
    pub patterns: &'static [&'static str],
    pub category: RejectionCategory,
}

#[derive(Debug, Clone, Copy)]
pub struct RejectionRules {
    pub rules: &'static [Rule],
    /// Shown when the server sent no usable message.
    pub fallback: &'static str,
}

const ACCOUNT_NOT_FOUND_ON_LOGIN: Rule = Rule {
    patterns: &["user does not exist", "user not found"],
    category: RejectionCategory::AccountNotFound,
};

const INVALID_CREDENTIALS: Rule = Rule {
    patterns: &["invalid credentials", "incorrect password"],
    category: RejectionCategory::InvalidCredentials,
};

const ACCOUNT_NOT_FOUND_ON_OTP: Rule = Rule {
    patterns: &["no account found", "user does not exist"],
    category: RejectionCategory::AccountNotFound,
};

pub const LOGIN_RULES: RejectionRules = RejectionRules {
    rules: &[ACCOUNT_NOT_FOUND_ON_LOGIN, INVALID_CREDENTIALS],
    fallback: "Login failed. Please try again.",
};

pub const SIGNUP_RULES: RejectionRules = RejectionRules {
    rules: &[],
    fallback: "Signup failed. Please try again.",
};

pub const REQUEST_OTP_RULES: RejectionRules = RejectionRules {
    rules: &[ACCOUNT_NOT_FOUND_ON_OTP],
    fallback: "Failed to send OTP. Please try again.",
};

pub const VERIFY_OTP_RULES: RejectionRules = RejectionRules {
    rules: &[],
    fallback: "Invalid OTP. Please try again.",
};

impl RejectionRules {
    /// Category and user-facing message for a rejection body.
    pub fn classify(&self, message: Option<&str>) -> (RejectionCategory, String) {
        let Some(message) = message.filter(|m| !m.trim().is_empty()) else {
            return (RejectionCategory::Other, self.fallback.to_string());
        };

        let lowered = message.to_lowercase();
        for rule in self.rules {
            if rule.patterns.iter().any(|p| lowered.contains(p)) {
                let text = rule
                    .category
                    .fixed_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| message.to_string());
                return (rule.category, text);
            }
        }

        (RejectionCategory::Other, message.to_string())
    }

    /// Convert a transport error from an auth endpoint into the error shown to the user.
    pub fn map_error(&self, err: ApiError) -> AppError {
        match err {
            ApiError::Http { status, message } => {
                let (category, message) = self.classify(message.as_deref());
                AppError::Rejected {
                    status,
                    category,
                    message,
                }
            }
            other => AppError::from(other),
        }
    }
}
