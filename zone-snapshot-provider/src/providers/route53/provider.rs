//! Route 53 `ZoneListingApi` trait 实现

use async_trait::async_trait;

use crate::error::{ProviderError, Result};
use crate::providers::sigv4::uri_encode;
use crate::traits::{ErrorContext, ProviderErrorMapper, ZoneListingApi};
use crate::types::{
    AliasTarget, HostedZone, ListPage, RecordCursor, RecordPayload, RecordSet, ResourceRecord,
    ZoneCursor, bare_zone_id,
};

use super::Route53Provider;
use super::types::{
    ListHostedZonesByNameResponse, ListResourceRecordSetsResponse, Route53HostedZone,
    Route53RecordSet,
};

/// `ListHostedZonesByName` 单页上限
const MAX_ZONE_PAGE_SIZE: u32 = 100;

impl Route53Provider {
    /// 将 Route 53 托管区域转换为内部类型
    pub(crate) fn convert_hosted_zone(zone: Route53HostedZone) -> HostedZone {
        let (comment, private_zone) = zone
            .config
            .map_or((None, None), |c| (c.comment, c.private_zone));
        HostedZone {
            id: zone.id,
            name: zone.name,
            caller_reference: zone.caller_reference,
            comment,
            private_zone,
            record_set_count: zone.resource_record_set_count,
        }
    }

    /// 将 Route 53 记录集转换为内部类型
    ///
    /// 字面值与别名目标必须恰好存在其一。
    pub(crate) fn convert_record_set(&self, record: Route53RecordSet) -> Result<RecordSet> {
        let values: Vec<ResourceRecord> = record
            .resource_records
            .map(|list| {
                list.items
                    .into_iter()
                    .map(|r| ResourceRecord { value: r.value })
                    .collect()
            })
            .unwrap_or_default();

        let payload = match (record.alias_target, values.is_empty()) {
            (Some(alias), true) => RecordPayload::Alias {
                alias_target: AliasTarget {
                    hosted_zone_id: alias.hosted_zone_id,
                    dns_name: alias.dns_name,
                    evaluate_target_health: alias.evaluate_target_health,
                },
            },
            (None, false) => RecordPayload::Values {
                resource_records: values,
            },
            (Some(_), false) => {
                return Err(self.invalid_record(
                    &record.name,
                    &record.record_type,
                    "both ResourceRecords and AliasTarget present",
                ));
            }
            (None, true) => {
                return Err(self.invalid_record(
                    &record.name,
                    &record.record_type,
                    "neither ResourceRecords nor AliasTarget present",
                ));
            }
        };

        Ok(RecordSet {
            name: record.name,
            record_type: record.record_type,
            set_identifier: record.set_identifier,
            weight: record.weight,
            region: record.region,
            failover: record.failover,
            multi_value_answer: record.multi_value_answer,
            ttl: record.ttl,
            payload,
            health_check_id: record.health_check_id,
        })
    }

    fn invalid_record(&self, name: &str, record_type: &str, detail: &str) -> ProviderError {
        ProviderError::ParseError {
            provider: self.provider_name().to_string(),
            detail: format!("record set {name} {record_type}: {detail}"),
        }
    }

    /// 将 `ListHostedZonesByName` 响应转换为分页结果
    pub(crate) fn hosted_zones_page(
        response: ListHostedZonesByNameResponse,
    ) -> ListPage<HostedZone, ZoneCursor> {
        ListPage {
            items: response
                .hosted_zones
                .items
                .into_iter()
                .map(Self::convert_hosted_zone)
                .collect(),
            is_truncated: response.is_truncated,
            next_cursor: ZoneCursor::from_parts(
                response.next_dns_name,
                response.next_hosted_zone_id,
            ),
        }
    }

    /// 将 `ListResourceRecordSets` 响应转换为分页结果
    pub(crate) fn record_sets_page(
        &self,
        response: ListResourceRecordSetsResponse,
    ) -> Result<ListPage<RecordSet, RecordCursor>> {
        let items = response
            .resource_record_sets
            .items
            .into_iter()
            .map(|r| self.convert_record_set(r))
            .collect::<Result<Vec<_>>>()?;

        Ok(ListPage {
            items,
            is_truncated: response.is_truncated,
            next_cursor: RecordCursor::from_parts(
                response.next_record_name,
                response.next_record_type,
                response.next_record_identifier,
            ),
        })
    }

    fn zone_query(&self, cursor: Option<&ZoneCursor>) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(cursor) = cursor {
            query.push(("dnsname".to_string(), cursor.dns_name.clone()));
            query.push(("hostedzoneid".to_string(), cursor.hosted_zone_id.clone()));
        }
        if let Some(size) = self.page_size {
            query.push((
                "maxitems".to_string(),
                size.min(MAX_ZONE_PAGE_SIZE).to_string(),
            ));
        }
        query
    }

    fn record_query(&self, cursor: Option<&RecordCursor>) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(cursor) = cursor {
            query.push(("name".to_string(), cursor.name.clone()));
            query.push(("type".to_string(), cursor.record_type.clone()));
            if let Some(identifier) = &cursor.identifier {
                query.push(("identifier".to_string(), identifier.clone()));
            }
        }
        if let Some(size) = self.page_size {
            query.push(("maxitems".to_string(), size.to_string()));
        }
        query
    }
}

#[async_trait]
impl ZoneListingApi for Route53Provider {
    fn id(&self) -> &'static str {
        "route53"
    }

    async fn list_hosted_zones(
        &self,
        cursor: Option<&ZoneCursor>,
    ) -> Result<ListPage<HostedZone, ZoneCursor>> {
        let response: ListHostedZonesByNameResponse = self
            .get(
                "/hostedzonesbyname",
                &self.zone_query(cursor),
                ErrorContext::default(),
            )
            .await?;

        Ok(Self::hosted_zones_page(response))
    }

    async fn list_record_sets(
        &self,
        zone_id: &str,
        cursor: Option<&RecordCursor>,
    ) -> Result<ListPage<RecordSet, RecordCursor>> {
        let bare_id = bare_zone_id(zone_id);
        let path = format!("/hostedzone/{}/rrset", uri_encode(bare_id));

        let response: ListResourceRecordSetsResponse = self
            .get(
                &path,
                &self.record_query(cursor),
                ErrorContext {
                    zone_id: Some(bare_id.to_string()),
                    ..ErrorContext::default()
                },
            )
            .await?;

        self.record_sets_page(response)
    }
}
