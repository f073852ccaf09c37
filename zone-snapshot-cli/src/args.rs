//! 命令行参数

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use zone_snapshot_core::SnapshotRunConfig;
use zone_snapshot_provider::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_REGION};

/// Archive every Route 53 hosted zone as JSON and CSV snapshots in S3.
#[derive(Parser, Debug)]
#[command(name = "zone-snapshot", version)]
#[command(about = "Archive every Route 53 hosted zone to an S3 bucket")]
pub struct Args {
    /// Destination bucket for the snapshots.
    #[arg(long, env = "ZONE_SNAPSHOT_BUCKET")]
    pub bucket: String,

    /// Region of the destination bucket.
    #[arg(long, default_value = DEFAULT_REGION, env = "ZONE_SNAPSHOT_REGION")]
    pub region: String,

    /// Number of zones processed at the same time.
    #[arg(long, default_value_t = zone_snapshot_core::services::DEFAULT_CONCURRENCY, env = "ZONE_SNAPSHOT_CONCURRENCY")]
    pub concurrency: usize,

    /// Retries for throttled or failed API calls and uploads.
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES, env = "ZONE_SNAPSHOT_MAX_RETRIES")]
    pub max_retries: u32,

    /// Overall run timeout in seconds.
    #[arg(long, default_value_t = 900, env = "ZONE_SNAPSHOT_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    /// Directory for staged artifacts (system temp dir by default).
    #[arg(long, env = "ZONE_SNAPSHOT_STAGING_DIR")]
    pub staging_dir: Option<PathBuf>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    pub report_json: bool,
}

impl Args {
    /// 运行配置
    pub fn run_config(&self) -> SnapshotRunConfig {
        SnapshotRunConfig {
            concurrency: self.concurrency,
            retry: RetryPolicy::with_max_retries(self.max_retries),
            run_timeout: Duration::from_secs(self.timeout_secs),
            staging_dir: self.staging_dir.clone(),
        }
    }
}
