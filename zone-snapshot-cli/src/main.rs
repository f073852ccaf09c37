//! Zone snapshot runner
//!
//! Lists every hosted zone of the account, exports each one as JSON and CSV,
//! and uploads both files to the configured bucket under the run timestamp.
//!
//! # Exit codes
//!
//! - `0`: every zone archived
//! - `1`: at least one zone failed (see the report)
//! - `2`: the run could not start, or listing the hosted zones failed
//!
//! Credentials come from `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the
//! optional `AWS_SESSION_TOKEN`.

mod args;
mod summary;

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use args::Args;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zone_snapshot_core::{RunContext, RunReport, SnapshotContext, SnapshotRunService};
use zone_snapshot_provider::{AwsCredentials, Route53Provider, S3ArchiveStore};

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    // 日志输出到 stderr，stdout 留给 JSON 报告
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(&args).await {
        Ok(report) => {
            if let Err(e) = print_report(&report, args.report_json) {
                tracing::error!("Failed to print run report: {e:#}");
            }
            if report.is_success() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            }
        }
        Err(e) => {
            tracing::error!("Snapshot run failed: {e:#}");
            ExitCode::from(2)
        }
    }
}

async fn run(args: &Args) -> Result<RunReport> {
    let credentials = AwsCredentials::from_env()
        .map_err(|missing| anyhow::anyhow!("environment variable {missing} is not set"))?;

    let listing_api = Route53Provider::new(credentials.clone())
        .context("Failed to create Route 53 client")?;
    let archive_store = S3ArchiveStore::builder(credentials, &args.bucket)
        .region(&args.region)
        .build()
        .context("Failed to create S3 client")?;

    let ctx = Arc::new(SnapshotContext::new(
        Arc::new(listing_api),
        Arc::new(archive_store),
    ));
    let service = SnapshotRunService::new(ctx, args.run_config())
        .context("Invalid run configuration")?;

    let run = RunContext::starting_now();
    tracing::info!(
        "Snapshot run {} starting (bucket {}, region {})",
        run.run_timestamp,
        args.bucket,
        args.region
    );

    service
        .run(&run)
        .await
        .context("Failed to list hosted zones")
}

fn print_report(report: &RunReport, as_json: bool) -> Result<()> {
    if as_json {
        let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{json}");
    } else {
        eprint!("{}", summary::render(report));
    }
    Ok(())
}
