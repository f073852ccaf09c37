//! Route 53 API XML type definition

use serde::Deserialize;

// ============ ListHostedZonesByName ============

/// Response payload for `ListHostedZonesByName`.
#[derive(Debug, Deserialize)]
pub struct ListHostedZonesByNameResponse {
    #[serde(rename = "HostedZones", default)]
    pub hosted_zones: HostedZoneList,
    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
    #[serde(rename = "NextDNSName")]
    pub next_dns_name: Option<String>,
    #[serde(rename = "NextHostedZoneId")]
    pub next_hosted_zone_id: Option<String>,
}

/// `<HostedZones>` wrapper element.
#[derive(Debug, Default, Deserialize)]
pub struct HostedZoneList {
    #[serde(rename = "HostedZone", default)]
    pub items: Vec<Route53HostedZone>,
}

/// Hosted zone item.
#[derive(Debug, Deserialize)]
pub struct Route53HostedZone {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "CallerReference")]
    pub caller_reference: Option<String>,
    #[serde(rename = "Config")]
    pub config: Option<HostedZoneConfig>,
    #[serde(rename = "ResourceRecordSetCount")]
    pub resource_record_set_count: Option<u64>,
}

/// `<Config>` of a hosted zone.
#[derive(Debug, Deserialize)]
pub struct HostedZoneConfig {
    #[serde(rename = "Comment")]
    pub comment: Option<String>,
    #[serde(rename = "PrivateZone")]
    pub private_zone: Option<bool>,
}

// ============ ListResourceRecordSets ============

/// Response payload for `ListResourceRecordSets`.
#[derive(Debug, Deserialize)]
pub struct ListResourceRecordSetsResponse {
    #[serde(rename = "ResourceRecordSets", default)]
    pub resource_record_sets: ResourceRecordSetList,
    #[serde(rename = "IsTruncated")]
    pub is_truncated: bool,
    #[serde(rename = "NextRecordName")]
    pub next_record_name: Option<String>,
    #[serde(rename = "NextRecordType")]
    pub next_record_type: Option<String>,
    #[serde(rename = "NextRecordIdentifier")]
    pub next_record_identifier: Option<String>,
}

/// `<ResourceRecordSets>` wrapper element.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordSetList {
    #[serde(rename = "ResourceRecordSet", default)]
    pub items: Vec<Route53RecordSet>,
}

/// Record set item.
#[derive(Debug, Deserialize)]
pub struct Route53RecordSet {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Type")]
    pub record_type: String,
    #[serde(rename = "SetIdentifier")]
    pub set_identifier: Option<String>,
    #[serde(rename = "Weight")]
    pub weight: Option<i64>,
    #[serde(rename = "Region")]
    pub region: Option<String>,
    #[serde(rename = "Failover")]
    pub failover: Option<String>,
    #[serde(rename = "MultiValueAnswer")]
    pub multi_value_answer: Option<bool>,
    #[serde(rename = "TTL")]
    pub ttl: Option<i64>,
    #[serde(rename = "ResourceRecords")]
    pub resource_records: Option<ResourceRecordList>,
    #[serde(rename = "AliasTarget")]
    pub alias_target: Option<Route53AliasTarget>,
    #[serde(rename = "HealthCheckId")]
    pub health_check_id: Option<String>,
}

/// `<ResourceRecords>` wrapper element.
#[derive(Debug, Default, Deserialize)]
pub struct ResourceRecordList {
    #[serde(rename = "ResourceRecord", default)]
    pub items: Vec<Route53ResourceRecord>,
}

/// A single `<ResourceRecord>`.
#[derive(Debug, Deserialize)]
pub struct Route53ResourceRecord {
    #[serde(rename = "Value")]
    pub value: String,
}

/// `<AliasTarget>` of a record set.
#[derive(Debug, Deserialize)]
pub struct Route53AliasTarget {
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    #[serde(rename = "EvaluateTargetHealth", default)]
    pub evaluate_target_health: bool,
}
