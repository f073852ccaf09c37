//! 分页聚合服务
//!
//! 将游标分页的列表接口完整拉取为有序集合：循环直到 `is_truncated == false`，
//! 每次把 API 返回的游标原样传给下一次调用。

use std::collections::HashSet;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;

use zone_snapshot_provider::{
    HostedZone, ListPage, RecordCursor, RecordSet, RetryPolicy, ZoneCursor, ZoneListingApi,
};

use crate::error::{CoreError, CoreResult};

/// 分页聚合器
#[derive(Debug, Clone, Copy, Default)]
pub struct PageAggregator {
    retry: RetryPolicy,
}

impl PageAggregator {
    /// 创建聚合器，单页请求按 `retry` 重试
    #[must_use]
    pub fn new(retry: RetryPolicy) -> Self {
        Self { retry }
    }

    /// 拉取全部页面并按页序、页内顺序拼接
    ///
    /// `fetch` 接收上一页返回的游标（首次为 `None`）。
    /// 截断页缺少游标，或返回本次拉取中已经出现过的游标，均视为畸形续页：
    /// 游标不前进时循环永远不会结束。
    pub async fn drain<T, C, F, Fut>(&self, listing: &str, mut fetch: F) -> CoreResult<Vec<T>>
    where
        C: Clone + Eq + Hash + Debug,
        F: FnMut(Option<C>) -> Fut,
        Fut: Future<Output = zone_snapshot_provider::Result<ListPage<T, C>>>,
    {
        let mut items = Vec::new();
        let mut cursor: Option<C> = None;
        let mut seen: HashSet<C> = HashSet::new();
        let mut pages_fetched = 0_usize;

        loop {
            let label = format!("list {listing} (page {})", pages_fetched + 1);
            let page = self
                .retry
                .run(&label, || fetch(cursor.clone()))
                .await
                .map_err(|source| CoreError::Pagination {
                    listing: listing.to_string(),
                    pages_fetched,
                    source,
                })?;

            pages_fetched += 1;
            items.extend(page.items);

            if !page.is_truncated {
                log::debug!(
                    "Listed {} {listing} in {pages_fetched} page(s)",
                    items.len()
                );
                return Ok(items);
            }

            let Some(next) = page.next_cursor else {
                return Err(CoreError::MalformedContinuation {
                    listing: listing.to_string(),
                    detail: format!("page {pages_fetched} is truncated but has no next cursor"),
                });
            };
            if !seen.insert(next.clone()) {
                return Err(CoreError::MalformedContinuation {
                    listing: listing.to_string(),
                    detail: format!("page {pages_fetched} repeats earlier cursor {next:?}"),
                });
            }

            log::debug!("{listing}: page {pages_fetched} truncated, next cursor {next:?}");
            cursor = Some(next);
        }
    }

    /// 拉取账户下所有托管区域
    pub async fn fetch_all_zones(&self, api: &dyn ZoneListingApi) -> CoreResult<Vec<HostedZone>> {
        self.drain("hosted zones", move |cursor: Option<ZoneCursor>| async move {
            api.list_hosted_zones(cursor.as_ref()).await
        })
        .await
    }

    /// 拉取某个托管区域的所有记录集
    pub async fn fetch_all_record_sets(
        &self,
        api: &dyn ZoneListingApi,
        zone_id: &str,
    ) -> CoreResult<Vec<RecordSet>> {
        let listing = format!("record sets of {zone_id}");
        self.drain(&listing, move |cursor: Option<RecordCursor>| async move {
            api.list_record_sets(zone_id, cursor.as_ref()).await
        })
        .await
    }
}
