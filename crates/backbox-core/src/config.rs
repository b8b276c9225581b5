//! Configuration module
//!
//! Client settings are read from `BACKBOX_*` environment variables (after loading an
//! optional `.env` file). Values are public; nothing secret is stored here.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const SESSION_DIR_NAME: &str = ".backbox";

/// Raw values as they appear in the environment.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    api_url: Option<String>,
    session_dir: Option<PathBuf>,
    request_timeout_secs: Option<u64>,
}

/// Client configuration.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Base URL of the remote API, without a trailing slash.
    pub api_url: String,
    /// Directory holding the persisted session.
    pub session_dir: PathBuf,
    /// Optional per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_raw(RawConfig::default(), home_dir())
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let raw: RawConfig = envy::prefixed("BACKBOX_")
            .from_env()
            .map_err(|e| anyhow::anyhow!("Invalid BACKBOX_* configuration: {}", e))?;

        let config = Self::from_raw(raw, home_dir());
        config.validate()?;
        Ok(config)
    }

    /// Build from explicit `(KEY, value)` pairs, e.g. in tests.
    pub fn from_vars<I>(vars: I) -> Result<Self, anyhow::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: RawConfig = envy::prefixed("BACKBOX_")
            .from_iter(vars)
            .map_err(|e| anyhow::anyhow!("Invalid BACKBOX_* configuration: {}", e))?;

        let config = Self::from_raw(raw, None);
        config.validate()?;
        Ok(config)
    }

    fn from_raw(raw: RawConfig, home: Option<PathBuf>) -> Self {
        let api_url = raw
            .api_url
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let session_dir = raw.session_dir.unwrap_or_else(|| match home {
            Some(home) => home.join(SESSION_DIR_NAME),
            None => PathBuf::from(SESSION_DIR_NAME),
        });

        Self {
            api_url,
            session_dir,
            request_timeout: raw
                .request_timeout_secs
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.api_url.is_empty() {
            return Err(anyhow::anyhow!("BACKBOX_API_URL must not be empty"));
        }

        if !self.api_url.starts_with("http://") && !self.api_url.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "BACKBOX_API_URL must start with http:// or https://"
            ));
        }

        Ok(())
    }
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}
