//! BackBox CLI: command-line client for the BackBox file API.
//!
//! Set BACKBOX_API_URL (default http://localhost:5000). The session is kept in
//! BACKBOX_SESSION_DIR (default ~/.backbox).

use anyhow::Context;
use backbox_cli::{
    confirm, init_tracing, parse_otp_command, prompt_line, render_file_table, render_stats,
    Client, OtpCommand, StatsView,
};
use backbox_core::{AppError, ClientConfig, FileRecord};
use backbox_services::{DownloadOutcome, OtpFlow, OtpStep, RemoveOutcome, SelectedFile};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "backbox", about = "BackBox file storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with email and password
    Login {
        email: String,
        /// Password (prompted when omitted)
        #[arg(long, env = "BACKBOX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Create an account
    Signup {
        email: String,
        /// Password, at least 6 characters (prompted when omitted)
        #[arg(long, env = "BACKBOX_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign in with a one-time code sent by email
    Otp {
        /// Email to send the code to (prompted when omitted)
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Upload a file
    Upload {
        /// Path to the file to upload
        file: PathBuf,
    },
    /// List uploaded files
    List {
        /// Only show files whose name contains this text (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Summary of uploaded files
    Stats {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Delete a file by ID
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long, short)]
        yes: bool,
    },
    /// Download a file by ID
    Download {
        id: String,
        /// Destination directory
        #[arg(long, default_value = ".")]
        out: PathBuf,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

/// Attach a hint to session-fatal errors.
fn fail(err: AppError) -> anyhow::Error {
    if err.redirect_to_login() {
        anyhow::Error::new(err).context("Run `backbox login` or `backbox otp` first")
    } else {
        anyhow::Error::new(err)
    }
}

async fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    match password {
        Some(password) => Ok(password),
        None => prompt_line("Password: ").await,
    }
}

async fn run_otp(client: &Client, email: Option<String>) -> anyhow::Result<()> {
    let mut flow = OtpFlow::new(client.auth());
    let mut initial_email = email;

    loop {
        match flow.step() {
            OtpStep::Request => {
                let email = match initial_email.take() {
                    Some(email) => email,
                    None => prompt_line("Email: ").await?,
                };
                flow.set_email(email.trim());
                match flow.request_code().await {
                    Ok(()) => {
                        if let Some(message) = flow.status().message() {
                            println!("{}", message);
                        }
                    }
                    Err(err) => eprintln!("{}", err.user_message()),
                }
            }
            OtpStep::Verify => {
                let remaining = flow.resend_remaining();
                let hint = if remaining > 0 {
                    format!("resend in {}s", remaining)
                } else {
                    "resend".to_string()
                };
                let line = prompt_line(&format!(
                    "Code sent to {} ({}, change, quit): ",
                    flow.email(),
                    hint
                ))
                .await?;

                match parse_otp_command(&line) {
                    OtpCommand::Resend => match flow.resend().await {
                        Ok(()) => println!("OTP sent again. Check your email."),
                        Err(err) => eprintln!("{}", err.user_message()),
                    },
                    OtpCommand::ChangeEmail => flow.change_email(),
                    OtpCommand::Quit => {
                        flow.teardown();
                        return Ok(());
                    }
                    OtpCommand::Code(code) => {
                        flow.editor_mut().paste(&code);
                        match flow.verify().await {
                            Ok(success) => {
                                println!("{}", success.message);
                                println!("Signed in as {}", success.session.user.email);
                                return Ok(());
                            }
                            Err(err) => eprintln!("{}", err.user_message()),
                        }
                    }
                }
            }
        }
    }
}

async fn find_file(client: &Client, id: &str) -> anyhow::Result<FileRecord> {
    let mut files = client.file_list();
    files.refresh().await.map_err(fail)?;
    files
        .find(id)
        .cloned()
        .with_context(|| format!("No file with ID {}", id))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let config = ClientConfig::from_env().context("Invalid BACKBOX_* configuration")?;
    let client = Client::connect(config).await?;

    match cli.command {
        Commands::Login { email, password } => {
            let password = password_or_prompt(password).await?;
            let success = client.auth().login(&email, &password).await.map_err(fail)?;
            tracing::debug!(route = ?success.redirect.route, "Signed in");
            println!("{}", success.message);
        }
        Commands::Signup { email, password } => {
            let password = password_or_prompt(password).await?;
            let success = client.auth().signup(&email, &password).await.map_err(fail)?;
            println!("{}", success.message);
            println!("Sign in with `backbox login {}`", email);
        }
        Commands::Otp { email } => {
            run_otp(&client, email).await?;
        }
        Commands::Logout => {
            client.auth().logout().await.map_err(fail)?;
            println!("Signed out.");
        }
        Commands::Whoami => match client.store.load().await? {
            Some(session) => println!("{}", session.user.email),
            None => println!("Not signed in."),
        },
        Commands::Upload { file } => {
            let selected = SelectedFile::from_path(&file).await.map_err(fail)?;
            let mut uploader = client.uploader();
            uploader.select_file(selected);
            eprintln!("Uploading {}...", file.display());
            let message = uploader.upload().await.map_err(fail)?;
            println!("{}", message);
        }
        Commands::List { search, format } => {
            let mut files = client.file_list();
            files.refresh().await.map_err(fail)?;
            let shown = files.search(search.as_deref().unwrap_or(""));
            match format {
                OutputFormat::Json => print_json(&shown)?,
                OutputFormat::Table => {
                    print!("{}", render_file_table(&shown, &chrono::Local::now()))
                }
            }
        }
        Commands::Stats { format } => {
            let mut files = client.file_list();
            files.refresh().await.map_err(fail)?;
            let now = chrono::Local::now();
            let stats = files.stats_at(&now);
            match format {
                OutputFormat::Json => print_json(&StatsView::from(&stats))?,
                OutputFormat::Table => println!("{}", render_stats(&stats, &now)),
            }
        }
        Commands::Delete { id, yes } => {
            let mut files = client.file_list();
            let outcome = files
                .remove(&id, || {
                    yes || confirm("Are you sure you want to delete this file?")
                })
                .await
                .map_err(fail)?;
            match outcome {
                RemoveOutcome::Removed => println!("File {} deleted.", id),
                RemoveOutcome::Cancelled => println!("Cancelled."),
            }
        }
        Commands::Download { id, out } => {
            let record = find_file(&client, &id).await?;
            let files = client.file_list();
            match files
                .download(&record.url, Some(&record.file_name), &out)
                .await
            {
                DownloadOutcome::Saved(path) => println!("Saved to {}", path.display()),
                DownloadOutcome::Fallback { url } => {
                    println!("Could not save the file. Open it directly: {}", url)
                }
            }
        }
    }

    Ok(())
}
