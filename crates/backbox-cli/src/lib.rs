//! Shared pieces of the `backbox` binary: client wiring, prompts and table rendering.

use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::Context;
use backbox_api_client::ApiClient;
use backbox_core::display::{file_badge, format_file_size, format_relative_time, truncate_string};
use backbox_core::{ClientConfig, FileRecord};
use backbox_services::{AuthService, FileListViewModel, FileStats, Uploader};
use backbox_storage::{LocalSessionBackend, SessionStore};
use chrono::{DateTime, TimeZone};
use serde::Serialize;

/// Initialize tracing for CLI binaries. Logs go to stderr so stdout stays parseable.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

/// Everything a command needs, built once from configuration.
pub struct Client {
    pub config: ClientConfig,
    pub api: Arc<ApiClient>,
    pub store: SessionStore,
}

impl Client {
    pub async fn connect(config: ClientConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let api = ApiClient::from_config(&config).context("Failed to create API client")?;
        let backend = LocalSessionBackend::new(&config.session_dir)
            .await
            .with_context(|| {
                format!(
                    "Failed to open session directory {}",
                    config.session_dir.display()
                )
            })?;

        tracing::debug!(
            api_url = %config.api_url,
            session_file = %backend.path().display(),
            "Client ready"
        );

        Ok(Self {
            config,
            api: Arc::new(api),
            store: SessionStore::new(Arc::new(backend)),
        })
    }

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.api.clone(), self.store.clone())
    }

    pub fn uploader(&self) -> Uploader {
        Uploader::new(self.api.clone(), self.store.clone())
    }

    pub fn file_list(&self) -> FileListViewModel {
        FileListViewModel::new(self.api.clone(), self.store.clone())
    }
}

/// Print a prompt and read one line from stdin without blocking the runtime.
///
/// End of input is an error so interactive loops cannot spin on a closed stdin.
pub async fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    let prompt = prompt.to_string();
    tokio::task::spawn_blocking(move || {
        let mut stdout = std::io::stdout();
        write!(stdout, "{}", prompt)?;
        stdout.flush()?;
        read_answer(std::io::stdin().lock())
    })
    .await
    .context("Prompt task failed")?
}

fn read_answer(mut input: impl BufRead) -> anyhow::Result<String> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        anyhow::bail!("stdin closed");
    }
    Ok(line.trim().to_string())
}

/// Blocking yes/no question. Anything but "y" or "yes" declines.
pub fn confirm(question: &str) -> bool {
    print!("{} [y/N] ", question);
    if std::io::stdout().flush().is_err() {
        return false;
    }
    read_answer(std::io::stdin().lock())
        .map(|answer| is_affirmative(&answer))
        .unwrap_or(false)
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Input accepted at the code prompt of `backbox otp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpCommand {
    Resend,
    ChangeEmail,
    Quit,
    Code(String),
}

pub fn parse_otp_command(line: &str) -> OtpCommand {
    match line.trim().to_lowercase().as_str() {
        "resend" | "r" => OtpCommand::Resend,
        "change" | "c" => OtpCommand::ChangeEmail,
        "quit" | "q" | "exit" => OtpCommand::Quit,
        _ => OtpCommand::Code(line.trim().to_string()),
    }
}

pub fn render_file_table<Tz: TimeZone>(files: &[&FileRecord], now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    if files.is_empty() {
        return "No files found.\n".to_string();
    }

    let mut out = format!(
        "{:<26} {:<5} {:<36} {:>12}  {}\n",
        "ID", "TYPE", "NAME", "SIZE", "UPLOADED"
    );
    out.push_str(&format!("{}\n", "-".repeat(96)));
    for file in files {
        out.push_str(&format!(
            "{:<26} {:<5} {:<36} {:>12}  {}\n",
            truncate_string(&file.id, 26),
            file_badge(&file.file_type),
            truncate_string(&file.file_name, 36),
            format_file_size(file.size),
            format_relative_time(file.uploaded_at, now.clone()),
        ));
    }
    out.push_str(&format!("\n{} file(s)\n", files.len()));
    out
}

/// JSON shape of `backbox stats --format json`.
#[derive(Debug, Serialize)]
pub struct StatsView<'a> {
    pub total_files: usize,
    pub uploaded_today: usize,
    pub latest: Option<&'a FileRecord>,
    pub file_types: usize,
    pub total_size_bytes: u64,
    pub total_size_mb: f64,
}

impl<'a> From<&FileStats<'a>> for StatsView<'a> {
    fn from(stats: &FileStats<'a>) -> Self {
        Self {
            total_files: stats.total,
            uploaded_today: stats.today,
            latest: stats.latest,
            file_types: stats.distinct_types,
            total_size_bytes: stats.total_bytes,
            total_size_mb: (stats.total_bytes as f64) / (1024.0 * 1024.0),
        }
    }
}

pub fn render_stats<Tz: TimeZone>(stats: &FileStats<'_>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = String::from("\n=== Upload Statistics ===\n\n");
    out.push_str(&format!("Total Files:    {:>6}\n", stats.total));
    out.push_str(&format!("Uploaded Today: {:>6}\n", stats.today));
    out.push_str(&format!("File Types:     {:>6}\n", stats.distinct_types));
    out.push_str(&format!(
        "Total Size:     {}\n",
        format_file_size(stats.total_bytes)
    ));
    match stats.latest {
        Some(latest) => out.push_str(&format!(
            "Last Upload:    {} ({})\n",
            truncate_string(&latest.file_name, 40),
            format_relative_time(latest.uploaded_at, now.clone())
        )),
        None => out.push_str("Last Upload:    -\n"),
    }
    out
}
