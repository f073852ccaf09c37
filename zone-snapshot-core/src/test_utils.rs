//! 测试辅助模块
//!
//! 提供脚本化的列表 API、记录上传内容的归档存储，以及便捷的测试数据工厂方法。

use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use zone_snapshot_provider::{
    AliasTarget, ArchiveStore, HostedZone, ListPage, ProviderError, RecordCursor, RecordSet,
    Result, ZoneCursor, ZoneListingApi,
};

type ZonePage = Result<ListPage<HostedZone, ZoneCursor>>;
type RecordPage = Result<ListPage<RecordSet, RecordCursor>>;

// ===== 测试数据 =====

pub fn zone(name: &str) -> HostedZone {
    HostedZone {
        id: format!("/hostedzone/Z{}", name.trim_end_matches('.').replace('.', "")),
        name: name.to_string(),
        caller_reference: None,
        comment: None,
        private_zone: Some(false),
        record_set_count: None,
    }
}

pub fn zone_cursor(dns_name: &str, hosted_zone_id: &str) -> ZoneCursor {
    ZoneCursor {
        dns_name: dns_name.to_string(),
        hosted_zone_id: hosted_zone_id.to_string(),
    }
}

pub fn a_record(name: &str, values: &[&str]) -> RecordSet {
    RecordSet::with_values(name, "A", Some(300), values.iter().copied())
}

pub fn alias_record(
    name: &str,
    record_type: &str,
    target_zone: &str,
    target_name: &str,
    evaluate: bool,
) -> RecordSet {
    RecordSet::with_alias(
        name,
        record_type,
        AliasTarget {
            hosted_zone_id: target_zone.to_string(),
            dns_name: target_name.to_string(),
            evaluate_target_health: evaluate,
        },
    )
}

pub fn network_error() -> ProviderError {
    ProviderError::NetworkError {
        provider: "fake".to_string(),
        detail: "connection reset".to_string(),
    }
}

// ===== ScriptedListingApi =====

/// 按脚本逐页返回结果，并记录每次调用收到的游标
pub struct ScriptedListingApi {
    zone_pages: Mutex<VecDeque<ZonePage>>,
    record_pages: Mutex<HashMap<String, VecDeque<RecordPage>>>,
    record_delays: Mutex<HashMap<String, Duration>>,
    zone_calls: Mutex<Vec<Option<ZoneCursor>>>,
    record_calls: Mutex<Vec<(String, Option<RecordCursor>)>>,
}

impl ScriptedListingApi {
    pub fn new() -> Self {
        Self {
            zone_pages: Mutex::new(VecDeque::new()),
            record_pages: Mutex::new(HashMap::new()),
            record_delays: Mutex::new(HashMap::new()),
            zone_calls: Mutex::new(Vec::new()),
            record_calls: Mutex::new(Vec::new()),
        }
    }

    /// 单页列出这些区域，每个区域单页列出给定记录
    pub async fn with_zones(zones: Vec<(HostedZone, Vec<RecordSet>)>) -> Self {
        let api = Self::new();
        let mut listed = Vec::new();
        for (zone, records) in zones {
            api.push_record_page(&zone.id, Ok(ListPage::last(records)))
                .await;
            listed.push(zone);
        }
        api.push_zone_page(Ok(ListPage::last(listed))).await;
        api
    }

    pub async fn push_zone_page(&self, page: ZonePage) {
        self.zone_pages.lock().await.push_back(page);
    }

    pub async fn push_record_page(&self, zone_id: &str, page: RecordPage) {
        self.record_pages
            .lock()
            .await
            .entry(zone_id.to_string())
            .or_default()
            .push_back(page);
    }

    /// 该区域的每次记录请求先等待 `delay`
    pub async fn delay_records(&self, zone_id: &str, delay: Duration) {
        self.record_delays
            .lock()
            .await
            .insert(zone_id.to_string(), delay);
    }

    pub async fn zone_calls(&self) -> Vec<Option<ZoneCursor>> {
        self.zone_calls.lock().await.clone()
    }

    pub async fn record_calls(&self) -> Vec<(String, Option<RecordCursor>)> {
        self.record_calls.lock().await.clone()
    }

    fn exhausted(what: &str) -> ProviderError {
        ProviderError::Unknown {
            provider: "fake".to_string(),
            raw_code: None,
            raw_message: format!("no scripted page left for {what}"),
        }
    }
}

#[async_trait]
impl ZoneListingApi for ScriptedListingApi {
    fn id(&self) -> &'static str {
        "fake"
    }

    async fn list_hosted_zones(
        &self,
        cursor: Option<&ZoneCursor>,
    ) -> Result<ListPage<HostedZone, ZoneCursor>> {
        self.zone_calls.lock().await.push(cursor.cloned());
        self.zone_pages
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Err(Self::exhausted("hosted zones")))
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        cursor: Option<&RecordCursor>,
    ) -> Result<ListPage<RecordSet, RecordCursor>> {
        self.record_calls
            .lock()
            .await
            .push((zone_id.to_string(), cursor.cloned()));

        let delay = self.record_delays.lock().await.get(zone_id).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.record_pages
            .lock()
            .await
            .get_mut(zone_id)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(Self::exhausted(zone_id)))
    }
}

// ===== RecordingArchiveStore =====

struct FailureRule {
    key_fragment: String,
    remaining: Option<u32>,
    error: ProviderError,
}

/// 记录上传内容的内存归档存储，可按键注入失败
pub struct RecordingArchiveStore {
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    failures: Mutex<Vec<FailureRule>>,
    delays: Mutex<Vec<(String, Duration)>>,
    attempts: Mutex<Vec<String>>,
}

impl RecordingArchiveStore {
    pub fn new() -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
            delays: Mutex::new(Vec::new()),
            attempts: Mutex::new(Vec::new()),
        }
    }

    /// 键包含 `fragment` 的上传先等待 `delay`
    pub async fn delay_uploads(&self, fragment: &str, delay: Duration) {
        self.delays
            .lock()
            .await
            .push((fragment.to_string(), delay));
    }

    /// 键包含 `fragment` 的上传始终失败
    pub async fn fail_always(&self, fragment: &str, error: ProviderError) {
        self.failures.lock().await.push(FailureRule {
            key_fragment: fragment.to_string(),
            remaining: None,
            error,
        });
    }

    /// 键包含 `fragment` 的上传前 `times` 次失败
    pub async fn fail_times(&self, fragment: &str, times: u32, error: ProviderError) {
        self.failures.lock().await.push(FailureRule {
            key_fragment: fragment.to_string(),
            remaining: Some(times),
            error,
        });
    }

    /// 成功上传的（键，内容），按完成顺序
    pub async fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.uploads.lock().await.clone()
    }

    pub async fn uploaded_keys(&self) -> Vec<String> {
        self.uploads
            .lock()
            .await
            .iter()
            .map(|(k, _)| k.clone())
            .collect()
    }

    /// 所有上传尝试的键（含失败）
    pub async fn attempts(&self) -> Vec<String> {
        self.attempts.lock().await.clone()
    }

    async fn injected_failure(&self, key: &str) -> Option<ProviderError> {
        let mut failures = self.failures.lock().await;
        let rule = failures
            .iter_mut()
            .find(|r| key.contains(&r.key_fragment) && r.remaining != Some(0))?;
        if let Some(remaining) = rule.remaining.as_mut() {
            *remaining -= 1;
        }
        Some(rule.error.clone())
    }
}

#[async_trait]
impl ArchiveStore for RecordingArchiveStore {
    fn id(&self) -> &'static str {
        "memory"
    }

    fn target(&self) -> &str {
        "memory-bucket"
    }

    async fn put_artifact(&self, key: &str, local_path: &Path) -> Result<()> {
        self.attempts.lock().await.push(key.to_string());
        let delay = self
            .delays
            .lock()
            .await
            .iter()
            .find(|(fragment, _)| key.contains(fragment.as_str()))
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.injected_failure(key).await {
            return Err(error);
        }

        let body = tokio::fs::read(local_path)
            .await
            .map_err(|e| ProviderError::ArtifactUnreadable {
                provider: "memory".to_string(),
                path: local_path.display().to_string(),
                detail: e.to_string(),
            })?;
        self.uploads.lock().await.push((key.to_string(), body));
        Ok(())
    }
}
