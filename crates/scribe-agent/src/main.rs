//! # scribe-agent
//!
//! The `scribe` binary. Two modes:
//!
//! - default: serve the JSON API (`scribe --host 127.0.0.1 --port 8787`)
//! - one-shot: analyze a single file and print the report
//!   (`scribe --file meeting.mp3`)

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use scribe_core::{AnalysisResult, format_size};
use scribe_llm::{GeminiClient, GeminiConfig};
use scribe_runtime::{Orchestrator, OrchestratorConfig, PacingConfig};
use scribe_server::ScribeServer;
use scribe_session::{PhaseStatus, SessionSnapshot};
use scribe_settings::ScribeSettings;

/// Scribe media analysis server.
#[derive(Parser, Debug)]
#[command(name = "scribe", about = "Turn audio and video into structured reports", version)]
struct Cli {
    /// Host to bind (overrides settings).
    #[arg(long)]
    host: Option<String>,

    /// Port to bind (overrides settings).
    #[arg(long)]
    port: Option<u16>,

    /// Analyze a single file and print the report instead of serving.
    #[arg(long)]
    file: Option<PathBuf>,

    /// Declared MIME type for `--file` (resolved from the extension when
    /// absent).
    #[arg(long)]
    mime: Option<String>,

    /// Settings file path (defaults to `~/.scribe/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn build_orchestrator(settings: &ScribeSettings) -> Result<Arc<Orchestrator>> {
    let api_key = settings
        .api
        .api_key
        .clone()
        .context("no API key configured")?;
    let client = GeminiClient::new(
        GeminiConfig::new(api_key)
            .with_model(&settings.api.model)
            .with_base_url(&settings.api.base_url)
            .with_timeout(Duration::from_millis(settings.api.timeout_ms)),
    )
    .context("failed to build Gemini client")?;

    let config = OrchestratorConfig {
        max_media_bytes: settings.limits.max_media_bytes,
        pacing: PacingConfig {
            upload_settle: Duration::from_millis(settings.pacing.upload_settle_ms),
            finalize_hold: Duration::from_millis(settings.pacing.finalize_hold_ms),
        },
    };
    Ok(Arc::new(Orchestrator::new(Arc::new(client), config)))
}

/// Print phase transitions as they happen during a one-shot run.
async fn render_progress(
    mut rx: tokio::sync::watch::Receiver<SessionSnapshot>,
) {
    let mut reported = [false; 4];
    loop {
        {
            let snapshot = rx.borrow_and_update();
            for (i, phase) in snapshot.phases.iter().enumerate() {
                if !reported[i] && phase.status == PhaseStatus::Completed {
                    reported[i] = true;
                    println!("  ✔ {}", phase.label);
                }
            }
        }
        if rx.changed().await.is_err() {
            break;
        }
    }
}

fn print_report(name: &str, size_bytes: u64, result: &AnalysisResult) {
    println!();
    println!("Report for {name} ({})", format_size(size_bytes));
    println!();
    println!("Executive Summary");
    println!("{}", result.summary);
    println!();
    println!("Key Points");
    for point in &result.key_points {
        println!("  - {point}");
    }
    if !result.action_items.is_empty() {
        println!();
        println!("Action Items");
        for item in &result.action_items {
            println!("  - {item}");
        }
    }
    println!();
    println!("Sentiment: {}", result.sentiment);
    println!();
    println!("Transcript");
    println!("{}", result.transcript);
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_logging();

    let settings_path = args
        .settings
        .unwrap_or_else(scribe_settings::settings_path);
    let mut settings = scribe_settings::load_settings_from_path(&settings_path)
        .with_context(|| format!("failed to load settings from {}", settings_path.display()))?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate().context("invalid configuration")?;

    let orchestrator = build_orchestrator(&settings)?;
    info!(
        version = scribe_core::VERSION,
        model = %settings.api.model,
        "scribe starting"
    );

    if let Some(file) = args.file {
        info!(path = %file.display(), "one-shot analysis");
        let progress = tokio::spawn(render_progress(orchestrator.subscribe()));
        let outcome = orchestrator.analyze_file(&file, args.mime.as_deref()).await;
        progress.abort();

        let result = outcome.map_err(|err| anyhow::anyhow!(err.user_message()))?;
        let size_bytes = tokio::fs::metadata(&file).await.map(|m| m.len()).unwrap_or(0);
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("media");
        print_report(name, size_bytes, &result);
        return Ok(());
    }

    ScribeServer::new(orchestrator)
        .serve(&settings.server.host, settings.server.port)
        .await
        .context("server failed")?;
    Ok(())
}
