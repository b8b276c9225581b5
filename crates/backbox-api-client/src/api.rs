//! Domain methods for the BackBox API client.
//!
//! Endpoints are grouped behind two traits: [`AuthApi`] for the anonymous user
//! endpoints and [`FileApi`] for the bearer-authenticated file endpoints.

use crate::{ApiClient, ApiError, Auth};
use async_trait::async_trait;
use backbox_core::models::{
    AuthResponse, CredentialsRequest, FileRecord, OtpRequest, UploadResponse, VerifyOtpRequest,
};
use bytes::Bytes;
use std::path::Path;

pub const LOGIN_PATH: &str = "/api/users/login";
pub const SIGNUP_PATH: &str = "/api/users/signup";
pub const REQUEST_OTP_PATH: &str = "/api/users/request-otp";
pub const VERIFY_OTP_PATH: &str = "/api/users/verify-otp";
pub const FILES_PATH: &str = "/api/files/";
pub const UPLOAD_PATH: &str = "/api/files/upload";

/// Anonymous authentication endpoints.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError>;

    async fn request_otp(&self, email: &str) -> Result<(), ApiError>;

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError>;
}

/// File endpoints. Everything except `fetch_bytes` requires a bearer token.
#[async_trait]
pub trait FileApi: Send + Sync {
    async fn list_files(&self, token: &str) -> Result<Vec<FileRecord>, ApiError>;

    /// Upload one local file as the single `file` field of a multipart form.
    async fn upload_file(&self, token: &str, path: &Path) -> Result<UploadResponse, ApiError>;

    async fn delete_file(&self, token: &str, id: &str) -> Result<(), ApiError>;

    /// Download a stored file from its public URL (media host, not the API).
    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, ApiError>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let body = CredentialsRequest { email, password };
        self.post_json(LOGIN_PATH, &body, Auth::Anonymous).await
    }

    async fn signup(&self, email: &str, password: &str) -> Result<(), ApiError> {
        let body = CredentialsRequest { email, password };
        self.post_json_no_content(SIGNUP_PATH, &body, Auth::Anonymous)
            .await
    }

    async fn request_otp(&self, email: &str) -> Result<(), ApiError> {
        let body = OtpRequest { email };
        self.post_json_no_content(REQUEST_OTP_PATH, &body, Auth::Anonymous)
            .await
    }

    async fn verify_otp(&self, email: &str, otp: &str) -> Result<AuthResponse, ApiError> {
        let body = VerifyOtpRequest { email, otp };
        self.post_json(VERIFY_OTP_PATH, &body, Auth::Anonymous)
            .await
    }
}

#[async_trait]
impl FileApi for ApiClient {
    async fn list_files(&self, token: &str) -> Result<Vec<FileRecord>, ApiError> {
        self.get(FILES_PATH, Auth::Bearer(token)).await
    }

    async fn upload_file(&self, token: &str, path: &Path) -> Result<UploadResponse, ApiError> {
        let buffer = tokio::fs::read(path).await?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");

        let form = reqwest::multipart::Form::new().part(
            "file",
            reqwest::multipart::Part::bytes(buffer).file_name(filename.to_string()),
        );

        self.post_multipart(UPLOAD_PATH, form, Auth::Bearer(token))
            .await
    }

    async fn delete_file(&self, token: &str, id: &str) -> Result<(), ApiError> {
        self.delete(
            &format!("{}{}", FILES_PATH, urlencoding::encode(id)),
            Auth::Bearer(token),
        )
        .await
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Bytes, ApiError> {
        let response = self.client().get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: None,
            });
        }

        Ok(response.bytes().await?)
    }
}
