//! Shared HTTP client for the BackBox API.
//!
//! Provides a minimal client with per-request auth (anonymous or Bearer token),
//! generic GET/POST/DELETE helpers, and the domain methods behind the
//! [`AuthApi`] and [`FileApi`] traits. Services depend on the traits so they can
//! be tested against fakes.

pub mod api;
pub mod error;

use backbox_core::models::MessageResponse;
use backbox_core::ClientConfig;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub use api::{AuthApi, FileApi};
pub use error::ApiError;

/// Authentication attached to a single request.
#[derive(Clone, Copy, Debug)]
pub enum Auth<'a> {
    Anonymous,
    /// `Authorization: Bearer {token}`
    Bearer(&'a str),
}

/// HTTP client for the BackBox API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.request_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder, auth: Auth<'_>) -> reqwest::RequestBuilder {
        match auth {
            Auth::Anonymous => request,
            Auth::Bearer(token) => request.bearer_auth(token),
        }
    }

    /// GET request. Deserializes JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth<'_>) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.get(&url), auth);

        let response = request.send().await?;
        let response = check_status(response).await?;

        response.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST JSON body and deserialize response.
    pub async fn post_json<T: DeserializeOwned, B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth<'_>,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body), auth);

        let response = request.send().await?;
        let response = check_status(response).await?;

        response.json().await.map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// POST JSON body when only the status matters; the response body is ignored.
    pub async fn post_json_no_content<B: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
        auth: Auth<'_>,
    ) -> Result<(), ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).json(body), auth);

        let response = request.send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// POST multipart form. A success body that is not JSON yields `T::default()`.
    pub async fn post_multipart<T: DeserializeOwned + Default>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
        auth: Auth<'_>,
    ) -> Result<T, ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.post(&url).multipart(form), auth);

        let response = request.send().await?;
        let response = check_status(response).await?;

        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str, auth: Auth<'_>) -> Result<(), ApiError> {
        let url = self.build_url(path);
        let request = self.apply_auth(self.client.delete(&url), auth);

        let response = request.send().await?;
        check_status(response).await?;
        Ok(())
    }

    /// Raw client for custom requests.
    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Pass success responses through; turn anything else into `ApiError::Http`
/// carrying the `message` field of the body when present.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<MessageResponse>(&text)
        .ok()
        .and_then(|body| body.message)
        .filter(|m| !m.trim().is_empty());

    tracing::debug!(status = status.as_u16(), "API request rejected");

    Err(ApiError::Http {
        status: status.as_u16(),
        message,
    })
}
