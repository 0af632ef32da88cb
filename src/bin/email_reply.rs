//! email-reply — generate a reply to an email from the command line
//!
//! Usage:
//!   email-reply [--tone friendly] [--length short] < email.txt
//!   email-reply --file email.txt --json
//!
//! Reads GEMINI_API_URL / GEMINI_API_KEY (and the other GEMINI_* knobs) from
//! the environment unless overridden by flags.

use ai_email_writer::config;
use ai_email_writer::{
    CancellationToken, GeminiConfig, GenerationRequest, ReplyGenerator, ReplyLength, ReplyOutcome,
    ERROR_REPLY_PREFIX,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "email-reply", version, about = "Generate a reply to an email")]
struct Args {
    /// Tone of the reply (e.g. professional, casual, friendly)
    #[arg(short, long)]
    tone: Option<String>,

    /// Reply length: short, medium or long
    #[arg(short, long)]
    length: Option<ReplyLength>,

    /// Read the email from this file instead of stdin
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Print a JSON outcome instead of plain text
    #[arg(long)]
    json: bool,

    /// Request timeout in seconds
    #[arg(long, env = "GEMINI_HTTP_TIMEOUT_SECS")]
    timeout_secs: Option<u64>,

    /// Endpoint URL (overrides GEMINI_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// API key (overrides GEMINI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<GeminiConfig> {
    load_config_with(args, |name| std::env::var(name).ok())
}

/// Flags take precedence over `env`; every other setting still comes from `env`.
fn load_config_with<F>(args: &Args, env: F) -> Result<GeminiConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let config = GeminiConfig::from_lookup(|name| match name {
        config::ENV_API_URL if args.api_url.is_some() => args.api_url.clone(),
        config::ENV_API_KEY if args.api_key.is_some() => args.api_key.clone(),
        _ => env(name),
    })?;

    Ok(match args.timeout_secs {
        Some(secs) => config.with_timeout(Duration::from_secs(secs.max(1))),
        None => config,
    })
}

fn read_email(args: &Args) -> Result<String> {
    match &args.file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read email from {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read email from stdin")?;
            Ok(buf)
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    setup_logging();
    let args = Args::parse();

    let email = read_email(&args)?;
    if email.trim().is_empty() {
        anyhow::bail!("No email content given (use --file or pipe the email on stdin)");
    }

    let generator = ReplyGenerator::builder()
        .config(load_config(&args)?)
        .build()?;
    debug!(config = ?generator.config(), "reply generator ready");

    let mut request = GenerationRequest::new(email);
    request.tone = args.tone.clone();
    request.length = args.length;

    let cancel = CancellationToken::new();
    let ctrl_c = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let result = generator.generate_with_cancel(&request, &cancel).await;
    ctrl_c.abort();

    let ok = result.is_ok();
    if args.json {
        let outcome = ReplyOutcome::from(result);
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        match result {
            Ok(reply) => println!("{}", reply),
            Err(e) => eprintln!("{}{}", ERROR_REPLY_PREFIX, e),
        }
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
