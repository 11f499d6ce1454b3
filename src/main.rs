use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use ai_llm_service::telemetry;
use anyhow::Context;
use clap::Parser;
use mr_reviewer::{ReviewRequest, ReviewResult, ReviewerKind, run_review};
use tokio_util::sync::CancellationToken;
use tracing::{Level, error};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Review one merge request: invocation JSON in, review JSON out.
#[derive(Debug, Parser)]
#[command(name = "mr-ai-reviewer", version)]
struct Cli {
    /// Reviewer kind: openai, openai-threads, claude, deepseek, gemini.
    #[arg(long, short, env = "MR_REVIEWER_KIND", default_value = "openai")]
    reviewer: ReviewerKind,

    /// Invocation document (`{title, description, author, diffs, vars}`); stdin when omitted.
    #[arg(long, short)]
    input: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Optional .env with RUST_LOG / MR_REVIEWER_KIND for local runs.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(telemetry::env_filter_with_level("info", Level::INFO))
        .with(telemetry::layer())
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    match run(&cli, &cancel).await {
        Ok(out) => match write_output(&out) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => report(e),
        },
        Err(e) => report(e),
    }
}

async fn run(cli: &Cli, cancel: &CancellationToken) -> anyhow::Result<ReviewResult> {
    let raw = match &cli.input {
        Some(path) => std::fs::read(path)
            .with_context(|| format!("reading invocation from {}", path.display()))?,
        None => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .context("reading invocation from stdin")?;
            buf
        }
    };

    let req: ReviewRequest =
        serde_json::from_slice(&raw).map_err(|e| mr_reviewer::Error::Input(e.to_string()))?;

    let out = run_review(&req, cli.reviewer, cancel)
        .await
        .with_context(|| format!("{} review failed", cli.reviewer))?;
    Ok(out)
}

fn write_output(out: &ReviewResult) -> anyhow::Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, out).context("writing review output")?;
    stdout.write_all(b"\n")?;
    stdout.flush()?;
    Ok(())
}

fn report(e: anyhow::Error) -> ExitCode {
    error!(error = %format!("{e:#}"), "review aborted");
    let doc = serde_json::json!({ "error": format!("{e:#}") });
    eprintln!("{doc}");
    ExitCode::FAILURE
}
