//! 外部依赖抽象 trait
//!
//! 列表 API 与归档存储的 trait 定义在 provider 库中，这里统一 re-export，
//! 平台层和测试可以注入自己的实现。

pub use zone_snapshot_provider::{ArchiveStore, ZoneListingApi};
