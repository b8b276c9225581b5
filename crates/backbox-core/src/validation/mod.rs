//! Local input validation
//!
//! Every check here runs before a request is built. Failures are returned as
//! [`ValidationError`] so the caller can show them inline.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

/// Minimum accepted password length on signup.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// Loose shape check: something@something.tld with no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Login: both fields present, then email shape.
pub fn validate_login(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// Signup: both fields present, password length, then email shape.
pub fn validate_signup(email: &str, password: &str) -> Result<(), ValidationError> {
    if email.is_empty() || password.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_otp_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingEmail);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

/// A code is accepted only when it is exactly six ASCII digits.
pub fn validate_otp_code(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        return Err(ValidationError::MissingOtp);
    }
    if code.len() != OTP_LENGTH || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::IncompleteOtp);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn login_checks_fields_before_shape() {
        assert_eq!(
            validate_login("", "secret"),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_login("a@b.com", ""),
            Err(ValidationError::MissingFields)
        );
        assert_eq!(
            validate_login("not-an-email", "secret"),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(validate_login("a@b.com", "x"), Ok(()));
    }

    #[test]
    fn signup_requires_six_characters() {
        assert_eq!(
            validate_signup("a@b.com", "12345"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(validate_signup("a@b.com", "123456"), Ok(()));
    }

    #[test]
    fn signup_checks_length_before_email() {
        assert_eq!(
            validate_signup("bad", "123"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
    }

    #[test]
    fn otp_email() {
        assert_eq!(validate_otp_email(""), Err(ValidationError::MissingEmail));
        assert_eq!(validate_otp_email("x"), Err(ValidationError::InvalidEmail));
        assert_eq!(validate_otp_email("a@b.com"), Ok(()));
    }

    #[test]
    fn otp_code_must_be_six_digits() {
        assert_eq!(validate_otp_code(""), Err(ValidationError::MissingOtp));
        assert_eq!(validate_otp_code("12345"), Err(ValidationError::IncompleteOtp));
        assert_eq!(validate_otp_code("1234567"), Err(ValidationError::IncompleteOtp));
        assert_eq!(validate_otp_code("12a456"), Err(ValidationError::IncompleteOtp));
        assert_eq!(validate_otp_code("123456"), Ok(()));
    }
}
