//! Authentication flows
//!
//! [`AuthService`] validates input locally, calls the [`AuthApi`], translates
//! rejections through [`rules`], and persists the resulting session. Each
//! successful call returns the message and redirect the caller should show.

pub mod rules;

use crate::navigation::{Redirect, Route};
use backbox_api_client::AuthApi;
use backbox_core::validation::{
    validate_login, validate_otp_code, validate_otp_email, validate_signup,
};
use backbox_core::{AppError, Session};
use backbox_storage::SessionStore;
use rules::{LOGIN_RULES, REQUEST_OTP_RULES, SIGNUP_RULES, VERIFY_OTP_RULES};
use std::sync::Arc;
use std::time::Duration;

pub const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(1500);
pub const SIGNUP_REDIRECT_DELAY: Duration = Duration::from_millis(2000);

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";
pub const SIGNUP_SUCCESS_MESSAGE: &str = "Account created successfully! Redirecting to login...";
pub const OTP_SENT_MESSAGE: &str = "OTP sent successfully! Check your email.";
pub const OTP_VERIFIED_MESSAGE: &str = "OTP verified successfully! Logging you in...";

/// Result of a successful sign-in (password or OTP).
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSuccess {
    pub session: Session,
    pub message: &'static str,
    pub redirect: Redirect,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SignupSuccess {
    pub message: &'static str,
    pub redirect: Redirect,
}

#[derive(Clone)]
pub struct AuthService {
    api: Arc<dyn AuthApi>,
    store: SessionStore,
}

impl AuthService {
    pub fn new(api: Arc<dyn AuthApi>, store: SessionStore) -> Self {
        Self { api, store }
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Password login. On success the session is persisted before returning.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSuccess, AppError> {
        let result = self.try_login(email, password).await;
        if let Err(err) = &result {
            err.log("login");
        }
        result
    }

    async fn try_login(&self, email: &str, password: &str) -> Result<AuthSuccess, AppError> {
        validate_login(email, password)?;

        let response = self
            .api
            .login(email, password)
            .await
            .map_err(|e| LOGIN_RULES.map_error(e))?;

        let session = Session::from(response);
        self.store.save(&session).await?;

        tracing::info!("Login successful");

        Ok(AuthSuccess {
            session,
            message: LOGIN_SUCCESS_MESSAGE,
            redirect: Redirect::after(Route::Home, LOGIN_REDIRECT_DELAY),
        })
    }

    /// Create an account. Signup never signs the user in.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn signup(&self, email: &str, password: &str) -> Result<SignupSuccess, AppError> {
        let result: Result<SignupSuccess, AppError> = async {
            validate_signup(email, password)?;
            self.api
                .signup(email, password)
                .await
                .map_err(|e| SIGNUP_RULES.map_error(e))?;
            tracing::info!("Account created");
            Ok(SignupSuccess {
                message: SIGNUP_SUCCESS_MESSAGE,
                redirect: Redirect::after(Route::Login, SIGNUP_REDIRECT_DELAY),
            })
        }
        .await;

        if let Err(err) = &result {
            err.log("signup");
        }
        result
    }

    /// Ask the server to email a one-time code.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn request_otp(&self, email: &str) -> Result<&'static str, AppError> {
        let result: Result<&'static str, AppError> = async {
            validate_otp_email(email)?;
            self.api
                .request_otp(email)
                .await
                .map_err(|e| REQUEST_OTP_RULES.map_error(e))?;
            tracing::info!("OTP requested");
            Ok(OTP_SENT_MESSAGE)
        }
        .await;

        if let Err(err) = &result {
            err.log("request_otp");
        }
        result
    }

    /// Exchange a six-digit code for a session.
    #[tracing::instrument(skip_all, fields(email = %email))]
    pub async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthSuccess, AppError> {
        let result: Result<AuthSuccess, AppError> = async {
            validate_otp_code(otp)?;
            let response = self
                .api
                .verify_otp(email, otp)
                .await
                .map_err(|e| VERIFY_OTP_RULES.map_error(e))?;

            let session = Session::from(response);
            self.store.save(&session).await?;
            tracing::info!("OTP verified");

            Ok(AuthSuccess {
                session,
                message: OTP_VERIFIED_MESSAGE,
                redirect: Redirect::after(Route::Home, LOGIN_REDIRECT_DELAY),
            })
        }
        .await;

        if let Err(err) = &result {
            err.log("verify_otp");
        }
        result
    }

    pub async fn logout(&self) -> Result<Redirect, AppError> {
        self.store.clear().await?;
        Ok(Redirect::now(Route::Login))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{memory_store, MockApi, MockReply};
    use backbox_core::{RejectionCategory, ValidationError};

    fn service(api: &Arc<MockApi>) -> (AuthService, backbox_storage::MemorySessionBackend) {
        let (store, backend) = memory_store();
        (AuthService::new(api.clone(), store), backend)
    }

    #[tokio::test]
    async fn login_persists_session_and_redirects_home() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::Session {
            token: "t1".into(),
            email: "a@b.com".into(),
        });
        let (auth, _) = service(&api);

        let success = auth.login("a@b.com", "secret1").await.unwrap();

        assert_eq!(success.message, "Login successful! Redirecting...");
        assert_eq!(success.redirect.route, Route::Home);
        assert_eq!(success.redirect.after, Duration::from_millis(1500));
        assert_eq!(auth.store().token().await.unwrap().as_deref(), Some("t1"));
        assert_eq!(
            auth.store().user().await.unwrap().map(|u| u.email),
            Some("a@b.com".to_string())
        );
    }

    #[tokio::test]
    async fn login_validation_never_calls_api() {
        let api = Arc::new(MockApi::new());
        let (auth, backend) = service(&api);

        let err = auth.login("", "x").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Validation(ValidationError::MissingFields)
        ));

        let err = auth.login("not-an-email", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid email address");

        assert_eq!(api.call_count(), 0);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn login_rejection_is_classified() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::http(404, "User does not exist"));
        api.push(MockReply::http(401, "Invalid credentials"));
        let (auth, backend) = service(&api);

        let err = auth.login("a@b.com", "secret1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "No account found with this email. Please sign up first."
        );

        let err = auth.login("a@b.com", "secret1").await.unwrap_err();
        assert!(matches!(
            err,
            AppError::Rejected {
                category: RejectionCategory::InvalidCredentials,
                ..
            }
        ));
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn login_unreachable_server() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::Unreachable);
        let (auth, _) = service(&api);

        let err = auth.login("a@b.com", "secret1").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot connect to server. Please check if the backend is running."
        );
    }

    #[tokio::test]
    async fn signup_checks_length_before_email() {
        let api = Arc::new(MockApi::new());
        let (auth, _) = service(&api);

        let err = auth.signup("bad", "123").await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Password must be at least 6 characters long"
        );
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn signup_redirects_to_login_without_session() {
        let api = Arc::new(MockApi::new());
        let (auth, backend) = service(&api);

        let success = auth.signup("new@b.com", "secret1").await.unwrap();

        assert_eq!(success.redirect, Redirect::after(Route::Login, SIGNUP_REDIRECT_DELAY));
        assert_eq!(api.calls(), vec!["signup:new@b.com".to_string()]);
        assert!(backend.is_empty());
    }

    #[tokio::test]
    async fn signup_rejection_passes_message_through() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::http(400, "User already exists"));
        let (auth, _) = service(&api);

        let err = auth.signup("a@b.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "User already exists");
    }

    #[tokio::test]
    async fn request_otp_messages() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::Ok);
        api.push(MockReply::http(404, "No account found"));
        api.push(MockReply::Http {
            status: 500,
            message: None,
        });
        let (auth, _) = service(&api);

        assert_eq!(
            auth.request_otp("a@b.com").await.unwrap(),
            "OTP sent successfully! Check your email."
        );
        assert_eq!(
            auth.request_otp("a@b.com").await.unwrap_err().to_string(),
            "No account found with this email. Please sign up first."
        );
        assert_eq!(
            auth.request_otp("a@b.com").await.unwrap_err().to_string(),
            "Failed to send OTP. Please try again."
        );
        assert_eq!(
            auth.request_otp("").await.unwrap_err().to_string(),
            "Please enter your email"
        );
    }

    #[tokio::test]
    async fn verify_otp_requires_six_digits() {
        let api = Arc::new(MockApi::new());
        let (auth, _) = service(&api);

        assert_eq!(
            auth.verify_otp("a@b.com", "").await.unwrap_err().to_string(),
            "Please enter the OTP"
        );
        assert_eq!(
            auth.verify_otp("a@b.com", "123").await.unwrap_err().to_string(),
            "OTP must be 6 digits"
        );
        assert_eq!(api.call_count(), 0);
    }

    #[tokio::test]
    async fn verify_otp_signs_in() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::Session {
            token: "otp-token".into(),
            email: "a@b.com".into(),
        });
        let (auth, _) = service(&api);

        let success = auth.verify_otp("a@b.com", "123456").await.unwrap();

        assert_eq!(success.message, "OTP verified successfully! Logging you in...");
        assert_eq!(success.redirect.route, Route::Home);
        assert_eq!(api.calls(), vec!["verify_otp:a@b.com:123456".to_string()]);
        assert_eq!(
            auth.store().token().await.unwrap().as_deref(),
            Some("otp-token")
        );
    }

    #[tokio::test]
    async fn verify_otp_rejection_fallback() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::Http {
            status: 400,
            message: None,
        });
        let (auth, _) = service(&api);

        let err = auth.verify_otp("a@b.com", "000000").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid OTP. Please try again.");
    }

    #[tokio::test]
    async fn logout_clears_session() {
        let api = Arc::new(MockApi::new());
        api.push(MockReply::Session {
            token: "t1".into(),
            email: "a@b.com".into(),
        });
        let (auth, backend) = service(&api);
        auth.login("a@b.com", "secret1").await.unwrap();

        let redirect = auth.logout().await.unwrap();

        assert_eq!(redirect, Redirect::now(Route::Login));
        assert!(backend.is_empty());
    }
}
