//! 类型定义模块

mod export;
mod report;

pub use export::{ArtifactEncoding, ExportRow, CSV_HEADER};
pub use report::{RunReport, ZoneOutcome, ZoneProgress, ZoneStage, ZoneStatus};

// Re-export provider 库的公共类型
pub use zone_snapshot_provider::{
    AliasTarget, HostedZone, ListPage, RecordCursor, RecordPayload, RecordSet, ResourceRecord,
    ZoneCursor,
};
