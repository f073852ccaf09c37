//! Zone Snapshot Core Library
//!
//! 托管区域快照的核心流程：
//! - 分页聚合（Pagination Aggregator）
//! - 记录集规范化（Record Normalizer）
//! - JSON / CSV 快照导出（Snapshot Exporter）
//! - 并发运行编排与结果汇总（Run Orchestrator）
//!
//! 列表 API 与归档存储通过 trait 注入，不依赖具体云厂商实现。

pub mod error;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use error::{CoreError, CoreResult};
pub use services::{
    PageAggregator, RunContext, SnapshotContext, SnapshotExporter, SnapshotRunConfig,
    SnapshotRunService,
};
pub use traits::{ArchiveStore, ZoneListingApi};
pub use types::{RunReport, ZoneOutcome, ZoneProgress, ZoneStage, ZoneStatus};
