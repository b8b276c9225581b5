//! Two-step OTP login
//!
//! [`OtpFlow`] drives the email step and the code step on top of
//! [`AuthService`], owning the six-cell [`OtpEditor`] and the
//! [`ResendCooldown`] that throttles repeat requests.

pub mod cooldown;
pub mod editor;

pub use cooldown::{ResendCooldown, RESEND_COOLDOWN_SECS};
pub use editor::{OtpEditor, OtpKey};

use crate::auth::{AuthService, AuthSuccess};
use crate::status::Status;
use backbox_core::{AppError, ValidationError};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OtpStep {
    /// Email entry.
    #[default]
    Request,
    /// Code entry, after a code was sent.
    Verify,
}

pub struct OtpFlow {
    auth: AuthService,
    step: OtpStep,
    email: String,
    editor: OtpEditor,
    cooldown: ResendCooldown,
    status: Status,
}

impl OtpFlow {
    pub fn new(auth: AuthService) -> Self {
        Self {
            auth,
            step: OtpStep::Request,
            email: String::new(),
            editor: OtpEditor::new(),
            cooldown: ResendCooldown::new(),
            status: Status::None,
        }
    }

    pub fn step(&self) -> OtpStep {
        self.step
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn editor(&self) -> &OtpEditor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut OtpEditor {
        &mut self.editor
    }

    /// Seconds until another code may be requested.
    pub fn resend_remaining(&self) -> u32 {
        self.cooldown.remaining()
    }

    pub fn subscribe_cooldown(&self) -> watch::Receiver<u32> {
        self.cooldown.subscribe()
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    /// Send a code to the current email. On success the flow moves to
    /// [`OtpStep::Verify`] and the resend cooldown starts.
    pub async fn request_code(&mut self) -> Result<(), AppError> {
        self.status = Status::None;

        match self.auth.request_otp(&self.email).await {
            Ok(message) => {
                self.step = OtpStep::Verify;
                self.cooldown.start();
                self.status = Status::Success(message.to_string());
                Ok(())
            }
            Err(err) => {
                self.status = Status::Error(err.user_message());
                Err(err)
            }
        }
    }

    /// Clear the code and request a new one, unless the cooldown is still running.
    pub async fn resend(&mut self) -> Result<(), AppError> {
        let remaining = self.cooldown.remaining();
        if remaining > 0 {
            let err = AppError::from(ValidationError::ResendTooSoon { remaining });
            self.status = Status::Error(err.user_message());
            return Err(err);
        }

        self.editor.clear();
        self.request_code().await
    }

    /// Submit the entered code. Success finishes the flow.
    pub async fn verify(&mut self) -> Result<AuthSuccess, AppError> {
        self.status = Status::None;

        let code = self.editor.code();
        match self.auth.verify_otp(&self.email, &code).await {
            Ok(success) => {
                self.cooldown.cancel();
                self.email.clear();
                self.editor.clear();
                self.status = Status::Success(success.message.to_string());
                Ok(success)
            }
            Err(err) => {
                self.status = Status::Error(err.user_message());
                Err(err)
            }
        }
    }

    /// Back to the email step. The cooldown keeps running.
    pub fn change_email(&mut self) {
        self.step = OtpStep::Request;
        self.editor.clear();
        self.status = Status::None;
    }

    /// Stop the cooldown task when the flow is abandoned.
    pub fn teardown(&mut self) {
        self.cooldown.cancel();
    }
}
