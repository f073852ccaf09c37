//! Route 53 listing and S3 archive clients

/// Shared utilities used by the clients.
pub mod common;

mod route53;
mod s3;
mod sigv4;

pub use route53::{Route53Provider, Route53ProviderBuilder};
pub use s3::{DEFAULT_REGION, S3ArchiveStore, S3ArchiveStoreBuilder};
