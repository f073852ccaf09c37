//! # zone-snapshot-provider
//!
//! Signed clients for the two remote services a zone snapshot run talks to:
//! the Route 53 listing API and an S3 bucket that receives the archived
//! artifacts.
//!
//! ## Clients
//!
//! | Client | Trait | Auth Method |
//! |--------|-------|-------------|
//! | [`Route53Provider`] | [`ZoneListingApi`] | AWS SigV4 (`route53`, `us-east-1`) |
//! | [`S3ArchiveStore`] | [`ArchiveStore`] | AWS SigV4 (`s3`, bucket region) |
//!
//! ## Feature Flags
//!
//! - **`native-tls`** *(default)* — Use the platform's native TLS implementation.
//! - **`rustls`** — Use rustls. Recommended for static builds and containers.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use zone_snapshot_provider::{AwsCredentials, Route53Provider, ZoneListingApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = AwsCredentials::new("AKID...", "secret");
//!     let provider = Route53Provider::new(credentials)?;
//!
//!     // One page at a time; follow `next_cursor` while `is_truncated`
//!     let page = provider.list_hosted_zones(None).await?;
//!     for zone in &page.items {
//!         println!("{} ({})", zone.name, zone.id);
//!     }
//!
//!     if let Some(zone) = page.items.first() {
//!         let records = provider.list_record_sets(&zone.id, None).await?;
//!         for record in &records.items {
//!             println!("{} {}", record.name, record.record_type);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All operations return [`Result<T, ProviderError>`](ProviderError):
//!
//! - [`ProviderError::InvalidCredentials`] — signature or key rejected
//! - [`ProviderError::ZoneNotFound`] — hosted zone disappeared
//! - [`ProviderError::BucketNotFound`] — archive bucket missing
//! - [`ProviderError::RateLimited`] — API throttling (retryable)
//! - [`ProviderError::NetworkError`] — connectivity issue or HTTP 5xx (retryable)
//!
//! The clients never retry on their own. Wrap calls in a [`RetryPolicy`] to
//! retry transient errors; each attempt is signed afresh.

mod error;
mod http_client;
mod providers;
mod retry;
mod traits;
mod types;
mod utils;

// Re-export error types
pub use error::{ProviderError, Result};

// Re-export retry policy
pub use retry::{DEFAULT_MAX_RETRIES, RetryPolicy};

// Re-export public traits only (error mapping stays internal)
pub use traits::{ArchiveStore, ZoneListingApi};

// Re-export types
pub use types::{
    AliasTarget, AwsCredentials, HostedZone, ListPage, RecordCursor, RecordPayload, RecordSet,
    ResourceRecord, ZoneCursor, bare_zone_id,
};

// Re-export concrete clients
pub use providers::{
    DEFAULT_REGION, Route53Provider, Route53ProviderBuilder, S3ArchiveStore, S3ArchiveStoreBuilder,
};
