//! Unified error type definition

use serde::Serialize;
use thiserror::Error;

// Re-export library error type
pub use zone_snapshot_provider::ProviderError;

/// Core layer error type
#[derive(Error, Debug, Serialize)]
#[serde(tag = "code", content = "details")]
pub enum CoreError {
    /// A page fetch failed permanently or after the retries were used up
    #[error("Listing {listing} failed after {pages_fetched} page(s): {source}")]
    Pagination {
        listing: String,
        pages_fetched: usize,
        source: ProviderError,
    },

    /// The API reported truncation without a usable continuation cursor
    #[error("Malformed continuation while listing {listing}: {detail}")]
    MalformedContinuation { listing: String, detail: String },

    /// Local staging write failure (disk full, permission, serialization)
    #[error("Export failed for zone {zone}: {detail}")]
    Export { zone: String, detail: String },

    /// Upload of a staged artifact failed
    #[error("Archiving {key} failed for zone {zone}: {source}")]
    Archival {
        zone: String,
        key: String,
        source: ProviderError,
    },

    /// The run deadline elapsed
    #[error("Run timed out while {0}")]
    TimedOut(String),

    /// Invalid run configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CoreError {
    /// Whether it is expected behavior (bad configuration, missing bucket or zone, etc.), used for log classification.
    ///
    /// Level `warn` should be used when returning `true` and level `error` when returning `false`.
    /// **Please update this method simultaneously when new variants are added.**
    #[must_use]
    pub fn is_expected(&self) -> bool {
        match self {
            Self::Config(_) => true,
            Self::Pagination { source, .. } | Self::Archival { source, .. } => source.is_expected(),
            Self::MalformedContinuation { .. } | Self::Export { .. } | Self::TimedOut(_) => false,
        }
    }
}

/// Core layer Result type alias
pub type CoreResult<T> = std::result::Result<T, CoreError>;
