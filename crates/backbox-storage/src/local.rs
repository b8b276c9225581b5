use crate::traits::{SessionBackend, StorageError, StorageResult};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

const SESSION_FILE_NAME: &str = "session.json";

/// Local filesystem session backend
///
/// All keys live in a single JSON object at `<dir>/session.json`. The file is
/// re-read on every access so edits made by another process are picked up, and
/// every write replaces it atomically (temp file + rename).
pub struct LocalSessionBackend {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl LocalSessionBackend {
    /// Create a new LocalSessionBackend instance
    ///
    /// # Arguments
    /// * `dir` - Directory holding the session file (created if missing)
    pub async fn new(dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let dir = dir.into();

        fs::create_dir_all(&dir).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create session directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        Ok(LocalSessionBackend {
            path: dir.join(SESSION_FILE_NAME),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StorageResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "{}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&raw)
            .map_err(|e| StorageError::Corrupt(format!("{}: {}", self.path.display(), e)))
    }

    async fn write_all(&self, values: &BTreeMap<String, String>) -> StorageResult<()> {
        let body = serde_json::to_vec_pretty(values)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, &body).await?;
        restrict_permissions(&tmp_path).await?;
        fs::rename(&tmp_path, &self.path).await?;

        tracing::debug!(path = %self.path.display(), keys = values.len(), "Session file written");
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> StorageResult<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> StorageResult<()> {
    Ok(())
}

#[async_trait]
impl SessionBackend for LocalSessionBackend {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let values = self.read_all().await?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values).await
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key).is_none() {
            return Ok(());
        }
        self.write_all(&values).await
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
