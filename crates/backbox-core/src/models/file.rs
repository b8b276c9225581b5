use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata for a file stored on the media host. Owned by the API; the client
/// only ever holds fetched copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub file_name: String,
    #[serde(default)]
    pub file_type: String,
    /// Size in bytes; 0 when the API did not report one.
    #[serde(default)]
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    pub url: String,
}

/// Body of a successful `POST /api/files/upload`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub file: Option<FileRecord>,
}
