//! Tag remediation CLI - handle one AWS Config compliance event.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use notify::Notifier;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tag_remediation::aws::{load_sdk_config, SsmDefaultTags, StsIdentityResolver, TaggingApiStore};
use tag_remediation::{HandlerConfig, RemediationHandler};

/// Apply default tags to a resource flagged by an AWS Config required-tag rule
#[derive(Parser)]
#[command(name = "tag-remediation")]
#[command(about = "Apply default tags to a resource flagged by an AWS Config required-tag rule")]
#[command(version)]
struct Cli {
    /// Path to the event JSON, or "-" for stdin
    #[arg(long, env = "TAG_REMEDIATION_EVENT", default_value = "-")]
    event: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", default_value = "text")]
    log_format: LogFormat,

    /// Enable debug logging (includes the raw event)
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum LogFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_format, cli.verbose);

    let raw = read_event(&cli.event)?;
    let config = HandlerConfig::from_env();
    tracing::debug!(?config, "Loaded configuration");

    let sdk_config = load_sdk_config(&config.region).await;
    let handler = RemediationHandler::new(
        config.clone(),
        Arc::new(StsIdentityResolver::new(&sdk_config, config.region.clone())),
        Arc::new(TaggingApiStore::new(&sdk_config)),
        Arc::new(SsmDefaultTags::new(&sdk_config)),
        Notifier::from_env(&sdk_config),
    );

    let response = handler.handle_raw(&raw).await;
    println!("{}", serde_json::to_string_pretty(&response)?);

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn init_tracing(format: LogFormat, verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("tag_remediation=debug,notify=debug,info")
        } else {
            EnvFilter::new("tag_remediation=info,notify=info,warn")
        }
    });

    // Logs go to stderr so stdout carries only the response.
    match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init(),
    }
}

fn read_event(source: &str) -> Result<String> {
    if source == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("Failed to read event from stdin")?;
        return Ok(raw);
    }

    let path = PathBuf::from(source);
    std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read event file {}", path.display()))
}
