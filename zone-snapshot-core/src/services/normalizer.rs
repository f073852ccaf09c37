//! 记录集规范化
//!
//! 一个记录集展开为若干导出行：别名记录恰好一行，字面值记录每个值一行。

use zone_snapshot_provider::{AliasTarget, RecordPayload, RecordSet};

use crate::types::ExportRow;

/// 别名目标的合成值：`ALIAS:<目标区域 id>:<目标 DNS 名称>`
#[must_use]
pub fn alias_token(alias: &AliasTarget) -> String {
    format!("ALIAS:{}:{}", alias.hosted_zone_id, alias.dns_name)
}

/// 记录集的值列表（按 API 返回顺序）
#[must_use]
pub fn record_values(record: &RecordSet) -> Vec<String> {
    match &record.payload {
        RecordPayload::Alias { alias_target } => vec![alias_token(alias_target)],
        RecordPayload::Values { resource_records } => resource_records
            .iter()
            .map(|r| r.value.clone())
            .collect(),
    }
}

/// 将一个记录集展开为导出行
///
/// 除 VALUE 外所有列在同一记录集的行之间相同。
#[must_use]
pub fn normalize(record: &RecordSet) -> Vec<ExportRow> {
    let evaluate_health = record.alias_target().map(|a| a.evaluate_target_health);

    record_values(record)
        .into_iter()
        .map(|value| ExportRow {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            value,
            ttl: record.ttl,
            region: record.region.clone(),
            weight: record.weight,
            set_identifier: record.set_identifier.clone(),
            failover: record.failover.clone(),
            evaluate_health,
        })
        .collect()
}

/// 按顺序展开一个区域的全部记录集
#[must_use]
pub fn normalize_all(records: &[RecordSet]) -> Vec<ExportRow> {
    records.iter().flat_map(normalize).collect()
}
