//! 业务逻辑服务层

pub mod normalizer;
mod pagination;
mod snapshot_exporter;
mod snapshot_run_service;

pub use pagination::PageAggregator;
pub use snapshot_exporter::{artifact_stem, SnapshotExporter, StagedArtifact, StagedSnapshot};
pub use snapshot_run_service::{
    RunContext, SnapshotRunConfig, SnapshotRunService, DEFAULT_CONCURRENCY, DEFAULT_RUN_TIMEOUT,
};

use std::sync::Arc;

use crate::traits::{ArchiveStore, ZoneListingApi};

/// 服务上下文 - 持有所有依赖
///
/// 平台层需要创建此上下文，并注入具体的列表 API 与归档存储实现。
pub struct SnapshotContext {
    /// 托管区域 / 记录集列表 API
    pub listing_api: Arc<dyn ZoneListingApi>,
    /// 快照归档存储
    pub archive_store: Arc<dyn ArchiveStore>,
}

impl SnapshotContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(listing_api: Arc<dyn ZoneListingApi>, archive_store: Arc<dyn ArchiveStore>) -> Self {
        Self {
            listing_api,
            archive_store,
        }
    }
}
