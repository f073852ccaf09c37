//! 快照运行服务
//!
//! 列出全部托管区域后并发处理每个区域：拉取记录集 → 导出 → 归档。
//! 单个区域失败不影响其他区域，结果统一汇总到 `RunReport`。

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tokio::sync::Mutex;
use zone_snapshot_provider::{HostedZone, RetryPolicy};

use crate::error::{CoreError, CoreResult};
use crate::services::pagination::PageAggregator;
use crate::services::snapshot_exporter::{SnapshotExporter, StagedSnapshot};
use crate::services::SnapshotContext;
use crate::types::{RunReport, ZoneOutcome, ZoneProgress, ZoneStage};
use crate::utils::datetime::run_timestamp;

/// 默认并发区域数
pub const DEFAULT_CONCURRENCY: usize = 4;

/// 默认运行超时（15 分钟）
pub const DEFAULT_RUN_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// 运行配置
#[derive(Debug, Clone)]
pub struct SnapshotRunConfig {
    /// 同时处理的区域数上限
    pub concurrency: usize,
    /// 列表请求与上传的重试策略
    pub retry: RetryPolicy,
    /// 整体运行超时
    pub run_timeout: Duration,
    /// 暂存根目录（`None` 使用系统临时目录）
    pub staging_dir: Option<PathBuf>,
}

impl Default for SnapshotRunConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            retry: RetryPolicy::default(),
            run_timeout: DEFAULT_RUN_TIMEOUT,
            staging_dir: None,
        }
    }
}

impl SnapshotRunConfig {
    /// 校验配置
    pub fn validate(&self) -> CoreResult<()> {
        if self.concurrency == 0 {
            return Err(CoreError::Config(
                "concurrency must be at least 1".to_string(),
            ));
        }
        if self.run_timeout.is_zero() {
            return Err(CoreError::Config(
                "run timeout must be greater than zero".to_string(),
            ));
        }
        if let Some(dir) = &self.staging_dir {
            if !dir.is_dir() {
                return Err(CoreError::Config(format!(
                    "staging directory {} does not exist",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}

/// 单次运行的上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// 运行时间戳，所有归档键的首段
    pub run_timestamp: String,
}

impl RunContext {
    /// 以 `started_at` 为运行时间创建上下文
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            run_timestamp: run_timestamp(started_at),
        }
    }

    /// 以当前时间创建上下文
    #[must_use]
    pub fn starting_now() -> Self {
        Self::new(Utc::now())
    }
}

/// 快照运行服务
pub struct SnapshotRunService {
    ctx: Arc<SnapshotContext>,
    config: SnapshotRunConfig,
    aggregator: PageAggregator,
    exporter: SnapshotExporter,
}

impl SnapshotRunService {
    /// 创建运行服务实例
    pub fn new(ctx: Arc<SnapshotContext>, config: SnapshotRunConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            aggregator: PageAggregator::new(config.retry),
            exporter: SnapshotExporter::new(config.staging_dir.clone()),
            ctx,
            config,
        })
    }

    /// 执行一次完整运行
    ///
    /// 列出托管区域失败时返回错误（没有可处理的区域）；之后每个区域的失败
    /// 都记录在报告中，不会中断运行。超时后未完成的区域记为 `timed-out`，
    /// 并附带已完成的阶段与已上传的键。报告中的归档目标取自归档存储本身。
    pub async fn run(&self, run: &RunContext) -> CoreResult<RunReport> {
        let deadline = tokio::time::Instant::now() + self.config.run_timeout;
        let archive_target = self.ctx.archive_store.target().to_string();

        log::info!(
            "Starting snapshot run {} into {archive_target} ({})",
            run.run_timestamp,
            self.ctx.archive_store.id()
        );

        let zones = tokio::time::timeout_at(
            deadline,
            self.aggregator
                .fetch_all_zones(self.ctx.listing_api.as_ref()),
        )
        .await
        .map_err(|_| CoreError::TimedOut("listing hosted zones".to_string()))??;

        log::info!(
            "Found {} hosted zone(s), processing up to {} concurrently",
            zones.len(),
            self.config.concurrency
        );

        let progress: Vec<Mutex<ZoneProgress>> =
            zones.iter().map(|_| Mutex::default()).collect();
        let mut outcomes: Vec<Option<ZoneOutcome>> = vec![None; zones.len()];
        {
            let mut pending = stream::iter(zones.iter().zip(&progress).enumerate())
                .map(|(index, (zone, progress))| async move {
                    (index, self.process_zone(zone, run, progress).await)
                })
                .buffer_unordered(self.config.concurrency);

            loop {
                match tokio::time::timeout_at(deadline, pending.next()).await {
                    Ok(Some((index, outcome))) => {
                        if let Some(slot) = outcomes.get_mut(index) {
                            *slot = Some(outcome);
                        }
                    }
                    Ok(None) => break,
                    Err(_) => {
                        log::error!(
                            "Run timeout of {}s elapsed, abandoning unfinished zones",
                            self.config.run_timeout.as_secs()
                        );
                        break;
                    }
                }
            }
        }

        // 未完成的区域已被取消，进度不再被持有
        let zones = zones
            .iter()
            .zip(outcomes)
            .zip(progress)
            .map(|((zone, outcome), progress)| {
                outcome.unwrap_or_else(|| {
                    let progress = progress.into_inner();
                    log::warn!(
                        "Zone {} timed out after {:?} with {} artifact(s) uploaded",
                        zone.name,
                        progress.last_completed,
                        progress.uploaded_keys.len()
                    );
                    ZoneOutcome::failed(
                        zone,
                        ZoneStage::TimedOut,
                        "run timeout elapsed before the zone finished",
                    )
                    .with_progress(progress)
                })
            })
            .collect();

        let report = RunReport {
            run_timestamp: run.run_timestamp.clone(),
            archive_target,
            zones,
        };

        if report.is_success() {
            log::info!(
                "Snapshot run {} archived {} zone(s)",
                report.run_timestamp,
                report.archived_count()
            );
        } else {
            log::warn!(
                "Snapshot run {} finished with {} failed zone(s) out of {}",
                report.run_timestamp,
                report.failed_zones().count(),
                report.zones.len()
            );
        }

        Ok(report)
    }

    /// 处理单个区域：拉取记录 → 导出 → 归档
    ///
    /// 每完成一步都更新 `progress`，区域被超时取消后仍可读取。
    async fn process_zone(
        &self,
        zone: &HostedZone,
        run: &RunContext,
        progress: &Mutex<ZoneProgress>,
    ) -> ZoneOutcome {
        let records = match self
            .aggregator
            .fetch_all_record_sets(self.ctx.listing_api.as_ref(), &zone.id)
            .await
        {
            Ok(records) => records,
            Err(e) => return Self::zone_failed(zone, ZoneStage::FetchRecords, &e, progress).await,
        };
        progress.lock().await.last_completed = Some(ZoneStage::FetchRecords);

        let staged = match self.export(zone, records).await {
            Ok(staged) => staged,
            Err(e) => return Self::zone_failed(zone, ZoneStage::Export, &e, progress).await,
        };
        progress.lock().await.last_completed = Some(ZoneStage::Export);

        // staged 在返回时被丢弃，暂存目录随之清理
        match self.archive(zone, &staged, run, progress).await {
            Ok(keys) => {
                log::info!(
                    "Archived zone {} ({} record sets)",
                    zone.name,
                    staged.record_sets()
                );
                ZoneOutcome::archived(zone, staged.record_sets(), keys)
            }
            Err(e) => Self::zone_failed(zone, ZoneStage::Archive, &e, progress).await,
        }
    }

    /// 在阻塞线程池中写暂存文件
    async fn export(
        &self,
        zone: &HostedZone,
        records: Vec<zone_snapshot_provider::RecordSet>,
    ) -> CoreResult<StagedSnapshot> {
        let exporter = self.exporter.clone();
        let owned_zone = zone.clone();
        tokio::task::spawn_blocking(move || exporter.export(&owned_zone, &records))
            .await
            .map_err(|e| CoreError::Export {
                zone: zone.name.clone(),
                detail: format!("export task failed: {e}"),
            })?
    }

    /// 依次上传暂存文件，返回归档键
    async fn archive(
        &self,
        zone: &HostedZone,
        staged: &StagedSnapshot,
        run: &RunContext,
        progress: &Mutex<ZoneProgress>,
    ) -> CoreResult<Vec<String>> {
        let mut keys = Vec::with_capacity(staged.artifacts().len());
        for artifact in staged.artifacts() {
            let key = staged.archive_key(&run.run_timestamp, artifact);
            self.config
                .retry
                .run(&format!("upload {key}"), || {
                    self.ctx.archive_store.put_artifact(&key, &artifact.path)
                })
                .await
                .map_err(|source| CoreError::Archival {
                    zone: zone.name.clone(),
                    key: key.clone(),
                    source,
                })?;
            log::debug!("Uploaded {key}");
            progress.lock().await.uploaded_keys.push(key.clone());
            keys.push(key);
        }
        Ok(keys)
    }

    async fn zone_failed(
        zone: &HostedZone,
        stage: ZoneStage,
        error: &CoreError,
        progress: &Mutex<ZoneProgress>,
    ) -> ZoneOutcome {
        if error.is_expected() {
            log::warn!("Zone {} failed at {stage}: {error}", zone.name);
        } else {
            log::error!("Zone {} failed at {stage}: {error}", zone.name);
        }
        ZoneOutcome::failed(zone, stage, error).with_progress(progress.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use zone_snapshot_provider::{ListPage, ProviderError, RecordSet};

    use super::*;
    use crate::test_utils::{
        a_record, alias_record, network_error, zone, zone_cursor, RecordingArchiveStore,
        ScriptedListingApi,
    };
    use crate::types::ZoneStatus;

    const TS: &str = "2024-01-01T00:00:00Z";

    fn run_ctx() -> RunContext {
        RunContext::new(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    fn config(staging: &tempfile::TempDir) -> SnapshotRunConfig {
        SnapshotRunConfig {
            concurrency: 2,
            retry: RetryPolicy::immediate(2),
            run_timeout: Duration::from_secs(30),
            staging_dir: Some(staging.path().to_path_buf()),
        }
    }

    fn service(
        api: &Arc<ScriptedListingApi>,
        store: &Arc<RecordingArchiveStore>,
        config: SnapshotRunConfig,
    ) -> SnapshotRunService {
        let ctx = Arc::new(SnapshotContext::new(api.clone(), store.clone()));
        SnapshotRunService::new(ctx, config).unwrap()
    }

    fn example_zone() -> (HostedZone, Vec<RecordSet>) {
        (
            zone("example.com."),
            vec![
                RecordSet::with_values("www", "A", Some(300), ["1.2.3.4", "1.2.3.5"]),
                alias_record("", "ALIAS", "Z123", "other.example.com.", true),
            ],
        )
    }

    #[test]
    fn run_context_formats_timestamp() {
        assert_eq!(run_ctx().run_timestamp, TS);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let zero = SnapshotRunConfig {
            concurrency: 0,
            ..SnapshotRunConfig::default()
        };
        assert!(matches!(zero.validate(), Err(CoreError::Config(_))));

        let missing_dir = SnapshotRunConfig {
            staging_dir: Some(PathBuf::from("/nonexistent/zone-snapshot-staging")),
            ..SnapshotRunConfig::default()
        };
        assert!(matches!(missing_dir.validate(), Err(CoreError::Config(_))));
        assert!(SnapshotRunConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn archives_every_zone_under_timestamped_keys() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(
            ScriptedListingApi::with_zones(vec![
                example_zone(),
                (zone("empty.example."), vec![]),
            ])
            .await,
        );
        let store = Arc::new(RecordingArchiveStore::new());

        let report = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(report.run_timestamp, TS);
        assert_eq!(report.archive_target, "memory-bucket");
        assert_eq!(report.archived_count(), 2);

        let mut keys = store.uploaded_keys().await;
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "2024-01-01T00:00:00Z/empty.example/empty.example.csv",
                "2024-01-01T00:00:00Z/empty.example/empty.example.json",
                "2024-01-01T00:00:00Z/example.com/example.com.csv",
                "2024-01-01T00:00:00Z/example.com/example.com.json",
            ]
        );

        let uploads = store.uploads().await;
        let csv = uploads
            .iter()
            .find(|(k, _)| k.ends_with("example.com/example.com.csv"))
            .map(|(_, body)| String::from_utf8(body.clone()).unwrap())
            .unwrap();
        assert_eq!(
            csv,
            "NAME,TYPE,VALUE,TTL,REGION,WEIGHT,SETID,FAILOVER,EVALUATE_HEALTH\n\
             www,A,1.2.3.4,300,,,,,\n\
             www,A,1.2.3.5,300,,,,,\n\
             ,ALIAS,ALIAS:Z123:other.example.com.,,,,,,true\n"
        );
    }

    #[tokio::test]
    async fn staging_is_cleaned_after_the_run() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedListingApi::with_zones(vec![example_zone()]).await);
        let store = Arc::new(RecordingArchiveStore::new());
        store
            .fail_always(
                "json",
                ProviderError::PermissionDenied {
                    provider: "memory".to_string(),
                    raw_message: None,
                },
            )
            .await;

        service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        let leftovers = std::fs::read_dir(staging.path()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn one_failed_zone_does_not_stop_the_others() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(
            ScriptedListingApi::with_zones(vec![
                (zone("a.example."), vec![a_record("a.example.", &["192.0.2.1"])]),
                (zone("b.example."), vec![a_record("b.example.", &["192.0.2.2"])]),
                (zone("c.example."), vec![a_record("c.example.", &["192.0.2.3"])]),
            ])
            .await,
        );
        let store = Arc::new(RecordingArchiveStore::new());
        store
            .fail_always(
                "/b.example/",
                ProviderError::PermissionDenied {
                    provider: "memory".to_string(),
                    raw_message: Some("Access Denied".to_string()),
                },
            )
            .await;

        let report = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(!report.is_success());
        let names: Vec<_> = report.zones.iter().map(|z| z.zone_name.as_str()).collect();
        assert_eq!(names, vec!["a.example.", "b.example.", "c.example."]);
        assert!(report.zones[0].is_archived());
        assert!(matches!(
            report.zones[1].status,
            ZoneStatus::Failed {
                stage: ZoneStage::Archive,
                ..
            }
        ));
        assert!(report.zones[2].is_archived());
        // 不可重试的错误只尝试一次
        let b_attempts = store
            .attempts()
            .await
            .into_iter()
            .filter(|k| k.contains("/b.example/"))
            .count();
        assert_eq!(b_attempts, 1);
    }

    #[tokio::test]
    async fn transient_upload_failures_are_retried() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedListingApi::with_zones(vec![example_zone()]).await);
        let store = Arc::new(RecordingArchiveStore::new());
        store.fail_times("example.com.csv", 2, network_error()).await;

        let report = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(report.is_success());
        assert_eq!(store.uploaded_keys().await.len(), 2);
        assert_eq!(store.attempts().await.len(), 4);
    }

    #[tokio::test]
    async fn record_fetch_failure_is_reported_per_zone() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedListingApi::new());
        api.push_zone_page(Ok(ListPage::last(vec![
            zone("gone.example."),
            zone("ok.example."),
        ])))
        .await;
        api.push_record_page(
            &zone("gone.example.").id,
            Err(ProviderError::ZoneNotFound {
                provider: "fake".to_string(),
                zone_id: zone("gone.example.").id,
                raw_message: None,
            }),
        )
        .await;
        api.push_record_page(&zone("ok.example.").id, Ok(ListPage::last(vec![])))
            .await;
        let store = Arc::new(RecordingArchiveStore::new());

        let report = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(matches!(
            report.zones[0].status,
            ZoneStatus::Failed {
                stage: ZoneStage::FetchRecords,
                ..
            }
        ));
        assert!(report.zones[1].is_archived());
    }

    #[tokio::test]
    async fn zone_listing_failure_aborts_the_run() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedListingApi::new());
        api.push_zone_page(Ok(ListPage::truncated(
            vec![zone("a.example.")],
            zone_cursor("b.example.", "Zb"),
        )))
        .await;
        api.push_zone_page(Err(ProviderError::InvalidCredentials {
            provider: "fake".to_string(),
            raw_message: None,
        }))
        .await;
        let store = Arc::new(RecordingArchiveStore::new());

        let result = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await;

        assert!(matches!(
            result,
            Err(CoreError::Pagination {
                pages_fetched: 1,
                ..
            })
        ));
        assert!(store.attempts().await.is_empty());
    }

    #[tokio::test]
    async fn timeout_reports_unfinished_zones() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(
            ScriptedListingApi::with_zones(vec![
                (zone("fast.example."), vec![a_record("fast.example.", &["192.0.2.1"])]),
                (zone("slow.example."), vec![a_record("slow.example.", &["192.0.2.2"])]),
            ])
            .await,
        );
        api.delay_records(&zone("slow.example.").id, Duration::from_secs(60))
            .await;
        let store = Arc::new(RecordingArchiveStore::new());
        let config = SnapshotRunConfig {
            run_timeout: Duration::from_millis(500),
            ..config(&staging)
        };

        let report = service(&api, &store, config)
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(!report.is_success());
        assert!(report.zones[0].is_archived());
        assert!(matches!(
            &report.zones[1].status,
            ZoneStatus::Failed {
                stage: ZoneStage::TimedOut,
                last_completed: None,
                uploaded_keys,
                ..
            } if uploaded_keys.is_empty()
        ));
    }

    #[tokio::test]
    async fn timed_out_zone_keeps_its_progress() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(
            ScriptedListingApi::with_zones(vec![(
                zone("slow.example."),
                vec![a_record("slow.example.", &["192.0.2.2"])],
            )])
            .await,
        );
        let store = Arc::new(RecordingArchiveStore::new());
        store
            .delay_uploads("slow.example.json", Duration::from_secs(60))
            .await;
        let config = SnapshotRunConfig {
            run_timeout: Duration::from_millis(500),
            ..config(&staging)
        };

        let report = service(&api, &store, config)
            .run(&run_ctx())
            .await
            .unwrap();

        assert_eq!(
            report.zones[0].status,
            ZoneStatus::Failed {
                stage: ZoneStage::TimedOut,
                error: "run timeout elapsed before the zone finished".to_string(),
                last_completed: Some(ZoneStage::Export),
                uploaded_keys: vec![
                    "2024-01-01T00:00:00Z/slow.example/slow.example.csv".to_string()
                ],
            }
        );
    }

    #[tokio::test]
    async fn archive_failure_reports_uploaded_artifacts() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedListingApi::with_zones(vec![example_zone()]).await);
        let store = Arc::new(RecordingArchiveStore::new());
        store
            .fail_always(
                "example.com.json",
                ProviderError::PermissionDenied {
                    provider: "memory".to_string(),
                    raw_message: None,
                },
            )
            .await;

        let report = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(matches!(
            &report.zones[0].status,
            ZoneStatus::Failed {
                stage: ZoneStage::Archive,
                last_completed: Some(ZoneStage::Export),
                uploaded_keys,
                ..
            } if uploaded_keys == &vec!["2024-01-01T00:00:00Z/example.com/example.com.csv".to_string()]
        ));
    }

    #[tokio::test]
    async fn empty_account_is_a_successful_run() {
        let staging = tempfile::tempdir().unwrap();
        let api = Arc::new(ScriptedListingApi::with_zones(vec![]).await);
        let store = Arc::new(RecordingArchiveStore::new());

        let report = service(&api, &store, config(&staging))
            .run(&run_ctx())
            .await
            .unwrap();

        assert!(report.is_success());
        assert!(report.zones.is_empty());
    }
}
