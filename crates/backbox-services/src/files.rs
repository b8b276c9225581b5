//! File dashboard view-model
//!
//! Caches the signed-in user's file list and derives everything the dashboard
//! shows from that cache: search results and summary statistics. The cache
//! only changes by a full re-fetch; deletes go to the server and are followed
//! by a refresh.

use backbox_api_client::{ApiError, FileApi};
use backbox_core::{AppError, FileRecord};
use backbox_storage::SessionStore;
use chrono::{DateTime, Local, TimeZone};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch files";
pub const DELETE_FAILED_MESSAGE: &str = "Failed to delete file. Please try again.";

/// Name used when a download has no usable file name.
pub const DEFAULT_DOWNLOAD_NAME: &str = "download";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The confirmation was declined and nothing was sent.
    Cancelled,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    Saved(PathBuf),
    /// The bytes could not be fetched or saved; open the URL directly instead.
    Fallback { url: String },
}

/// Summary figures shown above the file table.
#[derive(Debug, Clone, PartialEq)]
pub struct FileStats<'a> {
    pub total: usize,
    /// Uploads on the same calendar day as "now" in its time zone.
    pub today: usize,
    pub latest: Option<&'a FileRecord>,
    pub distinct_types: usize,
    pub total_bytes: u64,
}

/// Derive stats from a file list, with "today" judged in the time zone of `now`.
pub fn compute_stats<'a, Tz: TimeZone>(files: &'a [FileRecord], now: &DateTime<Tz>) -> FileStats<'a> {
    let today_date = now.date_naive();
    let tz = now.timezone();

    let today = files
        .iter()
        .filter(|f| f.uploaded_at.with_timezone(&tz).date_naive() == today_date)
        .count();

    let latest = files.iter().fold(None::<&FileRecord>, |best, f| match best {
        Some(b) if f.uploaded_at <= b.uploaded_at => Some(b),
        _ => Some(f),
    });

    let distinct_types = files
        .iter()
        .map(|f| f.file_type.as_str())
        .collect::<HashSet<_>>()
        .len();

    FileStats {
        total: files.len(),
        today,
        latest,
        distinct_types,
        total_bytes: files.iter().map(|f| f.size).sum(),
    }
}

pub struct FileListViewModel {
    api: Arc<dyn FileApi>,
    store: SessionStore,
    files: Vec<FileRecord>,
}

impl FileListViewModel {
    pub fn new(api: Arc<dyn FileApi>, store: SessionStore) -> Self {
        Self {
            api,
            store,
            files: Vec::new(),
        }
    }

    /// Cached list in server order.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn find(&self, id: &str) -> Option<&FileRecord> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Re-fetch the list, replacing the cache on success.
    pub async fn refresh(&mut self) -> Result<&[FileRecord], AppError> {
        match self.fetch().await {
            Ok(files) => {
                tracing::debug!(count = files.len(), "File list refreshed");
                self.files = files;
                Ok(&self.files)
            }
            Err(err) => {
                err.log("refresh");
                Err(err)
            }
        }
    }

    async fn fetch(&self) -> Result<Vec<FileRecord>, AppError> {
        let token = self.require_token().await?;

        match self.api.list_files(&token).await {
            Ok(files) => Ok(files),
            Err(err) => Err(self.map_error(err, AppError::FetchFailed, FETCH_FAILED_MESSAGE).await),
        }
    }

    /// Delete a file after `confirm` agrees, then refresh.
    ///
    /// A failed delete leaves the cache as it was.
    pub async fn remove(
        &mut self,
        id: &str,
        confirm: impl FnOnce() -> bool,
    ) -> Result<RemoveOutcome, AppError> {
        if !confirm() {
            tracing::debug!(file_id = %id, "Delete cancelled");
            return Ok(RemoveOutcome::Cancelled);
        }

        let token = self.require_token().await?;

        if let Err(err) = self.api.delete_file(&token, id).await {
            let err = self
                .map_error(err, AppError::DeleteFailed, DELETE_FAILED_MESSAGE)
                .await;
            err.log("remove");
            return Err(err);
        }

        tracing::info!(file_id = %id, "File deleted");
        self.refresh().await?;
        Ok(RemoveOutcome::Removed)
    }

    /// Case-insensitive substring match on the file name. An empty term matches everything.
    pub fn search(&self, term: &str) -> Vec<&FileRecord> {
        let needle = term.to_lowercase();
        self.files
            .iter()
            .filter(|f| f.file_name.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn stats(&self) -> FileStats<'_> {
        self.stats_at(&Local::now())
    }

    pub fn stats_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> FileStats<'_> {
        compute_stats(&self.files, now)
    }

    /// Fetch `url` and save it as `name` inside `dest_dir`.
    ///
    /// Only the final path component of `name` is used. Any failure yields
    /// [`DownloadOutcome::Fallback`] rather than an error.
    pub async fn download(&self, url: &str, name: Option<&str>, dest_dir: &Path) -> DownloadOutcome {
        let file_name = sanitize_file_name(name);
        let target = dest_dir.join(&file_name);

        let saved = async {
            let bytes = self.api.fetch_bytes(url).await.map_err(AppError::from)?;
            tokio::fs::write(&target, &bytes).await?;
            Ok::<_, AppError>(bytes.len())
        }
        .await;

        match saved {
            Ok(len) => {
                tracing::info!(path = %target.display(), bytes = len, "File downloaded");
                DownloadOutcome::Saved(target)
            }
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "Download failed, falling back to direct link");
                DownloadOutcome::Fallback {
                    url: url.to_string(),
                }
            }
        }
    }

    async fn require_token(&self) -> Result<String, AppError> {
        self.store.token().await?.ok_or(AppError::SignInRequired)
    }

    /// 401 ends the session; other HTTP failures become `failed(message)`.
    async fn map_error(
        &self,
        err: ApiError,
        failed: fn(String) -> AppError,
        message: &str,
    ) -> AppError {
        if err.is_unauthorized() {
            if let Err(e) = self.store.clear().await {
                tracing::error!(error = %e, "Failed to clear expired session");
            }
            return AppError::SessionExpired;
        }

        match err {
            ApiError::Unreachable(_) => AppError::Unreachable,
            other => {
                tracing::debug!(error = %other, "File request failed");
                failed(message.to_string())
            }
        }
    }
}

fn sanitize_file_name(name: Option<&str>) -> String {
    name.and_then(|n| Path::new(n).file_name())
        .and_then(|n| n.to_str())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(DEFAULT_DOWNLOAD_NAME)
        .to_string()
}
