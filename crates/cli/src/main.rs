//! `vidgen` -- submit one image-to-video generation and follow it.
//!
//! Submits the request, polls the job until it completes or fails, and
//! prints every lifecycle event to stdout as a JSON line. Logs go to
//! stderr. Ctrl-C stops polling.
//!
//! # Environment variables
//!
//! | Variable               | Required | Default                     | Description                   |
//! |------------------------|----------|-----------------------------|-------------------------------|
//! | `VIDGEN_API_URL`       | no       | `http://localhost:3000/api` | Backend base URL              |
//! | `VIDGEN_API_TOKEN`     | no       | --                          | Bearer token                  |
//! | `REQUEST_TIMEOUT_SECS` | no       | `30`                        | Per-request transport timeout |
//! | `POLL_INTERVAL_MS`     | no       | `2000`                      | Delay between status queries  |
//! | `RUST_LOG`             | no       | `vidgen_cli=info,vidgen_client=info` | Log filter           |

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use vidgen_cli::args::Args;
use vidgen_cli::run;
use vidgen_client::api::HttpVideoApi;
use vidgen_client::config::ClientConfig;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let fmt_layer = if args.json_logs {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidgen_cli=info,vidgen_client=info".into()),
        )
        .with(fmt_layer)
        .init();

    // --- Configuration ---
    let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
    args.apply_to(&mut config);
    tracing::info!(
        api_url = %config.api_url,
        poll_interval_ms = config.poll_interval_ms,
        authenticated = config.api_token.is_some(),
        "Loaded client configuration",
    );

    // --- Backend ---
    let api = HttpVideoApi::new(&config).context("Failed to build HTTP client")?;

    // --- Submit and poll ---
    let request = args.request();
    let mut stdout = std::io::stdout().lock();
    let outcome = run::run_generation(
        Arc::new(api),
        &request,
        config.poll_interval(),
        &mut stdout,
        async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                std::future::pending::<()>().await;
            }
        },
    )
    .await?;

    Ok(ExitCode::from(run::exit_status(&outcome)))
}
