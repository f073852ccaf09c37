use std::path::Path;

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::types::{HostedZone, ListPage, RecordCursor, RecordSet, ZoneCursor};

/// 原始 API 错误（内部使用）
#[derive(Debug, Clone)]
pub(crate) struct RawApiError {
    /// 错误码（如 `Throttling`、`NoSuchBucket`）
    pub code: Option<String>,
    /// 原始错误消息
    pub message: String,
}

impl RawApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }
}

/// 错误上下文信息（内部使用）
/// 用于在映射错误时提供额外信息
#[derive(Debug, Clone, Default)]
pub(crate) struct ErrorContext {
    /// Hosted zone id（用于 `ZoneNotFound`）
    pub zone_id: Option<String>,
    /// Bucket 名称（用于 `BucketNotFound`）
    pub bucket: Option<String>,
    /// HTTP 状态码（错误码缺失时回退使用）
    pub status: Option<u16>,
}

/// 错误映射 Trait（内部使用）
/// 各客户端实现此 trait 以将原始 API 错误映射到统一错误类型
pub(crate) trait ProviderErrorMapper {
    /// 返回客户端标识符
    fn provider_name(&self) -> &'static str;

    /// 将原始 API 错误映射到统一错误类型
    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError;

    /// 快捷方法：未知错误（fallback）
    fn unknown_error(&self, raw: RawApiError) -> ProviderError {
        ProviderError::Unknown {
            provider: self.provider_name().to_string(),
            raw_code: raw.code,
            raw_message: raw.message,
        }
    }
}

/// 托管区域列表 API
///
/// 两个列表端点各自使用独立的游标类型，互不通用。
/// 每次调用只返回一页；聚合所有页由调用方负责。
#[async_trait]
pub trait ZoneListingApi: Send + Sync {
    /// 提供商标识符
    fn id(&self) -> &'static str;

    /// 获取一页托管区域（`cursor` 为 `None` 时从头开始）
    async fn list_hosted_zones(
        &self,
        cursor: Option<&ZoneCursor>,
    ) -> Result<ListPage<HostedZone, ZoneCursor>>;

    /// 获取某个托管区域的一页记录集
    async fn list_record_sets(
        &self,
        zone_id: &str,
        cursor: Option<&RecordCursor>,
    ) -> Result<ListPage<RecordSet, RecordCursor>>;
}

/// 归档存储
///
/// 一次写入、尽力而为的存储端：上传成功后本地文件由调用方清理。
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    /// 存储标识符
    fn id(&self) -> &'static str;

    /// 归档目标（如 bucket 名称），写入运行报告
    fn target(&self) -> &str;

    /// 将本地文件上传到 `key`
    async fn put_artifact(&self, key: &str, local_path: &Path) -> Result<()>;
}
