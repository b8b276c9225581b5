//! Single-file upload
//!
//! [`Uploader`] holds the current selection and drag state, and sends the
//! selected file to `POST /api/files/upload` with the stored bearer token. The
//! busy flag stays raised for at least [`MIN_BUSY_DURATION`] so a progress
//! indicator never flickers on fast uploads.

use crate::status::Status;
use backbox_api_client::{ApiError, FileApi};
use backbox_core::{AppError, ValidationError};
use backbox_storage::SessionStore;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::Instant;

pub const MIN_BUSY_DURATION: Duration = Duration::from_millis(1200);

pub const UPLOAD_SUCCESS_MESSAGE: &str = "File uploaded successfully!";
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed. Please try again.";
pub const UPLOAD_UNAVAILABLE_MESSAGE: &str = "Unable to upload the file right now.";

/// A local file chosen for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl SelectedFile {
    pub fn new(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            path,
            file_name,
            size,
        }
    }

    /// Stat a path on disk. Directories are rejected.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref();
        let metadata = tokio::fs::metadata(path).await?;
        if !metadata.is_file() {
            return Err(AppError::Upload(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
        Ok(Self::new(path, metadata.len()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub selected: Option<SelectedFile>,
    pub is_dragging: bool,
    pub is_uploading: bool,
    pub status: Status,
}

pub struct Uploader {
    api: Arc<dyn FileApi>,
    store: SessionStore,
    state: UploadState,
    busy: watch::Sender<bool>,
}

impl Uploader {
    pub fn new(api: Arc<dyn FileApi>, store: SessionStore) -> Self {
        let (busy, _) = watch::channel(false);
        Self {
            api,
            store,
            state: UploadState::default(),
            busy,
        }
    }

    pub fn state(&self) -> &UploadState {
        &self.state
    }

    /// Follow the busy flag, e.g. to drive a spinner.
    pub fn subscribe_busy(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }

    pub fn select_file(&mut self, file: SelectedFile) {
        tracing::debug!(file_name = %file.file_name, size = file.size, "File selected");
        self.state.selected = Some(file);
        self.state.status = Status::None;
    }

    pub fn clear_selection(&mut self) {
        self.state.selected = None;
    }

    pub fn drag_enter(&mut self) {
        self.state.is_dragging = true;
    }

    pub fn drag_leave(&mut self) {
        self.state.is_dragging = false;
    }

    pub fn drop_file(&mut self, file: SelectedFile) {
        self.state.is_dragging = false;
        self.select_file(file);
    }

    /// Upload the selected file. Returns the success message shown to the user.
    ///
    /// Nothing is sent when no file is selected or no token is stored. A 401
    /// clears the stored session.
    ///
    /// The call does not return before [`MIN_BUSY_DURATION`] has passed since
    /// the request started, even when the server answers sooner. The result is
    /// held back until then along with the busy flag, so the status and the
    /// cleared selection only change once the call returns.
    pub async fn upload(&mut self) -> Result<String, AppError> {
        let result = self.try_upload().await;

        self.state.status = match &result {
            Ok(message) => Status::Success(message.clone()),
            Err(err) => {
                err.log("upload");
                Status::Error(err.user_message())
            }
        };
        result
    }

    async fn try_upload(&mut self) -> Result<String, AppError> {
        let Some(file) = self.state.selected.clone() else {
            return Err(ValidationError::NoFileSelected.into());
        };

        let Some(token) = self.store.token().await? else {
            return Err(ValidationError::MissingToken.into());
        };

        let start = Instant::now();
        self.set_busy(true);
        self.state.status = Status::None;

        tracing::info!(file_name = %file.file_name, size = file.size, "Uploading file");
        let response = self.api.upload_file(&token, &file.path).await;

        tokio::time::sleep_until(start + MIN_BUSY_DURATION).await;
        self.set_busy(false);

        match response {
            Ok(body) => {
                let message = body
                    .message
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| UPLOAD_SUCCESS_MESSAGE.to_string());
                tracing::info!(
                    file_name = %file.file_name,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Upload complete"
                );
                self.clear_selection();
                Ok(message)
            }
            Err(err) if err.is_unauthorized() => {
                self.store.clear().await?;
                Err(AppError::SessionExpired)
            }
            Err(ApiError::Http { message, .. }) => Err(AppError::Upload(
                message.unwrap_or_else(|| UPLOAD_FAILED_MESSAGE.to_string()),
            )),
            Err(err) => {
                tracing::debug!(error = %err, "Upload transport failure");
                Err(AppError::Upload(UPLOAD_UNAVAILABLE_MESSAGE.to_string()))
            }
        }
    }

    fn set_busy(&mut self, busy: bool) {
        self.state.is_uploading = busy;
        self.busy.send_replace(busy);
    }
}
