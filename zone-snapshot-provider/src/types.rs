use serde::{Deserialize, Serialize};

// ============ Pagination ============

/// One page of a cursor-paginated listing.
///
/// `next_cursor` is only meaningful when `is_truncated` is `true`; a truncated
/// page without a cursor is a malformed continuation and must be rejected by
/// the caller rather than treated as the last page.
///
/// # Type Parameters
///
/// * `T` — The item type ([`HostedZone`], [`RecordSet`]).
/// * `C` — The cursor type ([`ZoneCursor`], [`RecordCursor`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListPage<T, C> {
    /// Items in this page, in API order.
    pub items: Vec<T>,
    /// Whether more pages follow.
    pub is_truncated: bool,
    /// Continuation state for the next request, exactly as returned by the API.
    pub next_cursor: Option<C>,
}

impl<T, C> ListPage<T, C> {
    /// A final (non-truncated) page.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            is_truncated: false,
            next_cursor: None,
        }
    }

    /// A truncated page that continues at `next`.
    pub fn truncated(items: Vec<T>, next: C) -> Self {
        Self {
            items,
            is_truncated: true,
            next_cursor: Some(next),
        }
    }
}

/// Continuation state for the hosted zone listing (`NextDNSName`, `NextHostedZoneId`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ZoneCursor {
    /// `NextDNSName` from the previous page.
    pub dns_name: String,
    /// `NextHostedZoneId` from the previous page.
    pub hosted_zone_id: String,
}

impl ZoneCursor {
    /// Builds a cursor only when both continuation fields are present.
    pub fn from_parts(dns_name: Option<String>, hosted_zone_id: Option<String>) -> Option<Self> {
        Some(Self {
            dns_name: dns_name?,
            hosted_zone_id: hosted_zone_id?,
        })
    }
}

/// Continuation state for the record set listing
/// (`NextRecordName`, `NextRecordType`, `NextRecordIdentifier`).
///
/// The identifier is only returned when the next record set carries a
/// `SetIdentifier` (weighted, latency, failover, ... routing).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordCursor {
    /// `NextRecordName` from the previous page.
    pub name: String,
    /// `NextRecordType` from the previous page.
    pub record_type: String,
    /// `NextRecordIdentifier` from the previous page, if any.
    pub identifier: Option<String>,
}

impl RecordCursor {
    /// Builds a cursor only when the name and type are both present.
    pub fn from_parts(
        name: Option<String>,
        record_type: Option<String>,
        identifier: Option<String>,
    ) -> Option<Self> {
        Some(Self {
            name: name?,
            record_type: record_type?,
            identifier,
        })
    }
}

// ============ Hosted Zones ============

/// A hosted zone as returned by the zone listing.
///
/// The name keeps its trailing dot (`"example.com."`); it is part of the
/// zone's identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostedZone {
    /// Opaque zone id, e.g. `"/hostedzone/Z123"`.
    #[serde(rename = "Id")]
    pub id: String,
    /// Fully-qualified zone name, trailing dot retained.
    #[serde(rename = "Name")]
    pub name: String,
    /// Caller reference supplied when the zone was created.
    #[serde(rename = "CallerReference", skip_serializing_if = "Option::is_none")]
    pub caller_reference: Option<String>,
    /// Zone comment, if any.
    #[serde(rename = "Comment", skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Whether the zone is private (VPC-scoped).
    #[serde(rename = "PrivateZone", skip_serializing_if = "Option::is_none")]
    pub private_zone: Option<bool>,
    /// Number of record sets in the zone, if reported.
    #[serde(
        rename = "ResourceRecordSetCount",
        skip_serializing_if = "Option::is_none"
    )]
    pub record_set_count: Option<u64>,
}

impl HostedZone {
    /// Zone id without the `/hostedzone/` prefix, as used in request paths.
    pub fn bare_id(&self) -> &str {
        bare_zone_id(&self.id)
    }

    /// Zone name without its trailing dot.
    pub fn name_without_dot(&self) -> &str {
        self.name.strip_suffix('.').unwrap_or(&self.name)
    }
}

/// Strips the `/hostedzone/` prefix from a zone id, if present.
pub fn bare_zone_id(id: &str) -> &str {
    id.strip_prefix("/hostedzone/").unwrap_or(id)
}

// ============ Record Sets ============

/// A literal value of a record set (`ResourceRecords[].Value`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    /// Value in presentation format, e.g. `"1.2.3.4"` or `"10 mail.example.com."`.
    #[serde(rename = "Value")]
    pub value: String,
}

/// Target of an alias record set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasTarget {
    /// Hosted zone id of the target resource.
    #[serde(rename = "HostedZoneId")]
    pub hosted_zone_id: String,
    /// DNS name of the target resource.
    #[serde(rename = "DNSName")]
    pub dns_name: String,
    /// Whether the alias inherits the health of the target.
    #[serde(rename = "EvaluateTargetHealth")]
    pub evaluate_target_health: bool,
}

/// The value payload of a record set: literal values or an alias, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordPayload {
    /// Points at another resource instead of carrying values.
    Alias {
        /// The alias target.
        #[serde(rename = "AliasTarget")]
        alias_target: AliasTarget,
    },
    /// Non-empty ordered list of literal values.
    Values {
        /// The values, in API order.
        #[serde(rename = "ResourceRecords")]
        resource_records: Vec<ResourceRecord>,
    },
}

/// A record set as returned by the record listing.
///
/// Serializes with the API's field names, so a `Vec<RecordSet>` renders as the
/// raw record set collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordSet {
    /// Record name, e.g. `"www.example.com."`.
    #[serde(rename = "Name")]
    pub name: String,
    /// Record type, e.g. `"A"`, `"MX"`.
    #[serde(rename = "Type")]
    pub record_type: String,
    /// Distinguishes record sets sharing name and type (routing policies).
    #[serde(rename = "SetIdentifier", skip_serializing_if = "Option::is_none")]
    pub set_identifier: Option<String>,
    /// Weighted routing weight.
    #[serde(rename = "Weight", skip_serializing_if = "Option::is_none")]
    pub weight: Option<i64>,
    /// Latency routing region.
    #[serde(rename = "Region", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Failover role (`PRIMARY` / `SECONDARY`).
    #[serde(rename = "Failover", skip_serializing_if = "Option::is_none")]
    pub failover: Option<String>,
    /// Multivalue answer routing flag.
    #[serde(rename = "MultiValueAnswer", skip_serializing_if = "Option::is_none")]
    pub multi_value_answer: Option<bool>,
    /// Time to live in seconds (absent for alias records).
    #[serde(rename = "TTL", skip_serializing_if = "Option::is_none")]
    pub ttl: Option<i64>,
    /// Literal values or alias target.
    #[serde(flatten)]
    pub payload: RecordPayload,
    /// Associated health check.
    #[serde(rename = "HealthCheckId", skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

impl RecordSet {
    /// A plain record set with literal values and no routing attributes.
    pub fn with_values<I, S>(name: &str, record_type: &str, ttl: Option<i64>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.to_string(),
            record_type: record_type.to_string(),
            set_identifier: None,
            weight: None,
            region: None,
            failover: None,
            multi_value_answer: None,
            ttl,
            payload: RecordPayload::Values {
                resource_records: values
                    .into_iter()
                    .map(|v| ResourceRecord { value: v.into() })
                    .collect(),
            },
            health_check_id: None,
        }
    }

    /// A plain alias record set with no routing attributes.
    pub fn with_alias(name: &str, record_type: &str, alias_target: AliasTarget) -> Self {
        Self {
            name: name.to_string(),
            record_type: record_type.to_string(),
            set_identifier: None,
            weight: None,
            region: None,
            failover: None,
            multi_value_answer: None,
            ttl: None,
            payload: RecordPayload::Alias { alias_target },
            health_check_id: None,
        }
    }

    /// The alias target, if this is an alias record set.
    pub fn alias_target(&self) -> Option<&AliasTarget> {
        match &self.payload {
            RecordPayload::Alias { alias_target } => Some(alias_target),
            RecordPayload::Values { .. } => None,
        }
    }

    /// The literal values, empty for alias record sets.
    pub fn resource_records(&self) -> &[ResourceRecord] {
        match &self.payload {
            RecordPayload::Alias { .. } => &[],
            RecordPayload::Values { resource_records } => resource_records,
        }
    }
}

// ============ Credentials ============

/// Static AWS credentials used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct AwsCredentials {
    /// Access key id.
    pub access_key_id: String,
    /// Secret access key.
    pub secret_access_key: String,
    /// Session token for temporary credentials.
    pub session_token: Option<String>,
}

impl AwsCredentials {
    /// Long-term credentials without a session token.
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Attaches a session token (temporary credentials).
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Reads `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY` and the optional
    /// `AWS_SESSION_TOKEN` from the environment.
    ///
    /// Returns the name of the first missing variable on failure.
    pub fn from_env() -> std::result::Result<Self, &'static str> {
        let non_empty = |name: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .ok_or(name)
        };
        let credentials = Self::new(
            non_empty("AWS_ACCESS_KEY_ID")?,
            non_empty("AWS_SECRET_ACCESS_KEY")?,
        );
        Ok(match non_empty("AWS_SESSION_TOKEN") {
            Ok(token) => credentials.with_session_token(token),
            Err(_) => credentials,
        })
    }
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("session_token", &self.session_token.as_ref().map(|_| "***"))
            .finish()
    }
}
