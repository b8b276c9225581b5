//! Scripted implementation of [`AuthApi`] and [`FileApi`].
//!
//! Replies are queued with [`MockApi::push`] and consumed in order by whichever
//! method is called next; an empty queue answers [`MockReply::Ok`]. Every call
//! is recorded as `"<method>:<arg>"`.

use async_trait::async_trait;
use backbox_api_client::{ApiError, AuthApi, FileApi};
use backbox_core::models::{AuthResponse, FileRecord, UploadResponse};
use backbox_core::User;
use bytes::Bytes;
use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum MockReply {
    Ok,
    Session { token: String, email: String },
    Message(String),
    Files(Vec<FileRecord>),
    Bytes(Vec<u8>),
    Http { status: u16, message: Option<String> },
    Unreachable,
}

impl MockReply {
    pub fn http(status: u16, message: &str) -> Self {
        MockReply::Http {
            status,
            message: Some(message.to_string()),
        }
    }

    fn into_error(self) -> Option<ApiError> {
        match self {
            MockReply::Http { status, message } => Some(ApiError::Http { status, message }),
            MockReply::Unreachable => Some(ApiError::Unreachable("connection refused".into())),
            _ => None,
        }
    }
}

#[derive(Default)]
pub struct MockApi {
    replies: Mutex<VecDeque<MockReply>>,
    calls: Mutex<Vec<String>>,
    latency: Mutex<Duration>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, reply: MockReply) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Simulated network latency applied to every call (uses tokio time).
    pub fn set_latency(&self, latency: Duration) {
        *self.latency.lock().unwrap() = latency;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn next(&self, call: String) -> MockReply {
        self.calls.lock().unwrap().push(call);
        let latency = *self.latency.lock().unwrap();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(MockReply::Ok)
    }

    fn auth_response(reply: MockReply, email: &str) -> Result<AuthResponse, ApiError> {
        match reply {
            MockReply::Session { token, email } => Ok(AuthResponse {
                token,
                user: User::new(email),
            }),
            other => match other.into_error() {
                Some(err) => Err(err),
                None => Ok(AuthResponse {
                    token: "token".to_string(),
                    user: User::new(email),
                }),
            },
        }
    }

    fn unit(reply: MockReply) -> Result<(), ApiError> {
        match reply.into_error() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl AuthApi for MockApi {
    async fn login(&self, email: &str, _password: &str) -> Result<AuthResponse, ApiError> {
        let reply = self.next(format!("login:{}", email)).await;
        Self::auth_response(reply, email)
    }

    async fn signup(&self, email: &str, _password: &str) -> Result<(), ApiError> {
        Self::unit(self.next(format!("signup:{}", email)).await)
    }

    async fn request_otp(&self, email: &str) -> Result<(), ApiError> {
        Self::unit(self.next(format!("request_otp:{}", email)).await)
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError> {
        let reply = self.next(format!("verify_otp:{}:{}", email, otp)).await;
        Self::auth_response(reply, email)
    }
}

#[async_trait]
impl FileApi for MockApi {
    async fn list_files(&self, token: &str) -> Result<Vec<FileRecord>, ApiError> {
        match self.next(format!("list_files:{}", token)).await {
            MockReply::Files(files) => Ok(files),
            other => other.into_error().map_or(Ok(Vec::new()), Err),
        }
    }

    async fn upload_file(&self, token: &str, path: &Path) -> Result<UploadResponse, ApiError> {
        let reply = self
            .next(format!("upload_file:{}:{}", token, path.display()))
            .await;
        match reply {
            MockReply::Message(message) => Ok(UploadResponse {
                message: Some(message),
                file: None,
            }),
            other => other
                .into_error()
                .map_or(Ok(UploadResponse::default()), Err),
        }
    }

    async fn delete_file(&self, token: &str, id: &str) -> Result<(), ApiError> {
        Self::unit(self.next(format!("delete_file:{}:{}", token, id)).await)
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, ApiError> {
        match self.next(format!("fetch_bytes:{}", url)).await {
            MockReply::Bytes(bytes) => Ok(Bytes::from(bytes)),
            other => other.into_error().map_or(Ok(Bytes::new()), Err),
        }
    }
}
