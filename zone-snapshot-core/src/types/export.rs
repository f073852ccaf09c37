//! Export related types.

use serde::{Deserialize, Serialize};

/// Column names of the tabular artifact, in order.
pub const CSV_HEADER: [&str; 9] = [
    "NAME",
    "TYPE",
    "VALUE",
    "TTL",
    "REGION",
    "WEIGHT",
    "SETID",
    "FAILOVER",
    "EVALUATE_HEALTH",
];

/// One row of the tabular artifact.
///
/// Optional attributes stay `None` here; they render as empty CSV fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    /// Record set name.
    #[serde(rename = "NAME")]
    pub name: String,
    /// Record type.
    #[serde(rename = "TYPE")]
    pub record_type: String,
    /// One literal value, or the `ALIAS:<zone>:<dns name>` token.
    #[serde(rename = "VALUE")]
    pub value: String,
    /// TTL in seconds (absent for alias records).
    #[serde(rename = "TTL")]
    pub ttl: Option<i64>,
    /// Latency routing region.
    #[serde(rename = "REGION")]
    pub region: Option<String>,
    /// Weighted routing weight.
    #[serde(rename = "WEIGHT")]
    pub weight: Option<i64>,
    /// Set identifier of a routing policy record.
    #[serde(rename = "SETID")]
    pub set_identifier: Option<String>,
    /// Failover role (`PRIMARY` / `SECONDARY`).
    #[serde(rename = "FAILOVER")]
    pub failover: Option<String>,
    /// Alias `EvaluateTargetHealth`; always `None` for literal records.
    #[serde(rename = "EVALUATE_HEALTH")]
    pub evaluate_health: Option<bool>,
}

/// Encodings a zone snapshot is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactEncoding {
    /// Indented JSON array of the raw record sets.
    Json,
    /// One row per record set value.
    Csv,
}

impl ArtifactEncoding {
    /// All encodings, in the order they are written and archived.
    pub const ALL: [Self; 2] = [Self::Csv, Self::Json];

    /// File extension without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}
