#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;
mod render;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use args::Args;
use clap::Parser;
use quill_config::{Config, TelemetryConfig};
use quill_llm::{CompletionAdapter, Failure, HttpTransport, Invocation, LiveOutput};
use secrecy::SecretString;
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Load configuration
    let mut config = Config::load_or_default(&args.config)?;
    apply_sampling_args(&mut config, &args)?;

    // Initialize telemetry
    let telemetry = match &args.log_filter {
        Some(filter) => Some(TelemetryConfig {
            filter: filter.clone(),
            ..config.telemetry.clone().unwrap_or_default()
        }),
        None => config.telemetry.clone(),
    };
    quill_telemetry::init(telemetry.as_ref(), "warn")?;

    tracing::debug!(config_path = %args.config.display(), "starting quill");

    let diff = read_diff(args.diff.as_deref()).await?;
    if diff.trim().is_empty() {
        anyhow::bail!("no changes to describe: the diff is empty");
    }

    let adapter = CompletionAdapter::from_config(&config, Arc::new(HttpTransport::new()?))?;
    let invocation = Invocation {
        prompt_text: diff,
        sampling: None,
        files: args.files,
        provider: args.provider,
        credential: args.api_key.map(SecretString::from),
        endpoint: args.endpoint,
        protocol: args.protocol,
        model: args.model,
    };

    // Mirror live output while the completion streams
    let live = LiveOutput::new();
    let shutdown = CancellationToken::new();
    let mirror = tokio::spawn(render::mirror(
        live.subscribe_answer(),
        live.subscribe_status(),
        shutdown.clone(),
    ));

    let outcome = tokio::select! {
        result = adapter.complete(invocation, &live) => Some(result),
        () = shutdown_signal() => None,
    };

    shutdown.cancel();
    mirror.await?;

    match outcome {
        Some(Ok(answer)) => {
            println!("{answer}");
            Ok(ExitCode::SUCCESS)
        }
        Some(Err(error)) => {
            let failure = Failure::from(error);
            tracing::error!(kind = %failure.kind, message = %failure.message, "completion failed");
            eprintln!("{failure}");
            Ok(ExitCode::FAILURE)
        }
        None => Ok(ExitCode::from(130)),
    }
}

/// Read the diff from `path`, or stdin when absent or `-`
async fn read_diff(path: Option<&Path>) -> anyhow::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read diff from {}", path.display())),
        _ => {
            let mut diff = String::new();
            tokio::io::stdin()
                .read_to_string(&mut diff)
                .await
                .context("failed to read diff from stdin")?;
            Ok(diff)
        }
    }
}

/// Fold command-line sampling values into `config`, held to the same ranges
/// as configured ones
fn apply_sampling_args(config: &mut Config, args: &Args) -> anyhow::Result<()> {
    let llm = &mut config.llm;
    if let Some(temperature) = args.temperature {
        llm.temperature = temperature;
    }
    if let Some(top_p) = args.top_p {
        llm.top_p = top_p;
    }
    if let Some(max_tokens) = args.max_tokens {
        llm.max_tokens = max_tokens;
    }

    config.validate().context("invalid sampling arguments")
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("interrupted, abandoning completion");
}
