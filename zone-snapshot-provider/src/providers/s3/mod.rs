//! S3 archive store

mod error;
mod store;

use reqwest::Client;

use crate::error::{ProviderError, Result};
use crate::providers::common::{create_http_client, host_of};
use crate::providers::sigv4::{SigV4Signer, uri_encode_path};
use crate::types::AwsCredentials;

/// Default archive region.
pub const DEFAULT_REGION: &str = "us-east-1";

/// S3 archive store.
///
/// Uploads staged artifacts with a single signed `PutObject` per key. A failed
/// upload is returned as is; wrap calls in a [`RetryPolicy`](crate::RetryPolicy)
/// to retry transient errors.
///
/// # Construction
///
/// ```rust,no_run
/// use zone_snapshot_provider::{AwsCredentials, S3ArchiveStore};
///
/// # fn main() -> zone_snapshot_provider::Result<()> {
/// let store = S3ArchiveStore::builder(AwsCredentials::new("AKID...", "secret"), "dns-backups")
///     .region("eu-west-1")
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct S3ArchiveStore {
    pub(crate) client: Client,
    pub(crate) signer: SigV4Signer,
    pub(crate) bucket: String,
    /// `scheme://host[:port]`
    pub(crate) endpoint: String,
    pub(crate) host: String,
    /// Whether the bucket goes in the path (`/{bucket}/{key}`) instead of the host.
    pub(crate) path_style: bool,
}

/// Builder for [`S3ArchiveStore`].
pub struct S3ArchiveStoreBuilder {
    credentials: AwsCredentials,
    bucket: String,
    region: String,
    endpoint: Option<String>,
}

impl S3ArchiveStoreBuilder {
    fn new(credentials: AwsCredentials, bucket: impl Into<String>) -> Self {
        Self {
            credentials,
            bucket: bucket.into(),
            region: DEFAULT_REGION.to_string(),
            endpoint: None,
        }
    }

    /// Bucket region (default `us-east-1`).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Override the endpoint (e.g. `http://localhost:9000` for an S3-compatible store).
    ///
    /// Custom endpoints use path-style addressing.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Build the [`S3ArchiveStore`] instance.
    pub fn build(self) -> Result<S3ArchiveStore> {
        if self.bucket.trim().is_empty() {
            return Err(ProviderError::InvalidParameter {
                provider: "s3".to_string(),
                param: "bucket".to_string(),
                detail: "bucket name must not be empty".to_string(),
            });
        }

        let (endpoint, path_style) = match self.endpoint {
            Some(endpoint) => (endpoint.trim_end_matches('/').to_string(), true),
            None => (
                format!("https://{}.s3.{}.amazonaws.com", self.bucket, self.region),
                false,
            ),
        };
        let host = host_of(&endpoint).to_string();

        Ok(S3ArchiveStore {
            client: create_http_client("s3")?,
            signer: SigV4Signer::new(self.credentials, self.region, "s3"),
            bucket: self.bucket,
            endpoint,
            host,
            path_style,
        })
    }
}

impl S3ArchiveStore {
    /// Creates a store for `bucket` in the default region.
    pub fn new(credentials: AwsCredentials, bucket: impl Into<String>) -> Result<Self> {
        Self::builder(credentials, bucket).build()
    }

    /// Returns a builder for customizing the store configuration.
    pub fn builder(credentials: AwsCredentials, bucket: impl Into<String>) -> S3ArchiveStoreBuilder {
        S3ArchiveStoreBuilder::new(credentials, bucket)
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Encoded request path for `key`.
    pub(crate) fn object_path(&self, key: &str) -> String {
        let key = uri_encode_path(key.trim_start_matches('/'));
        if self.path_style {
            format!("/{}/{key}", uri_encode_path(&self.bucket))
        } else {
            format!("/{key}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> AwsCredentials {
        AwsCredentials::new("a", "b")
    }

    #[test]
    fn default_endpoint_is_virtual_hosted() {
        let store = S3ArchiveStore::builder(creds(), "dns-backups")
            .region("eu-west-1")
            .build()
            .unwrap();
        assert_eq!(store.endpoint, "https://dns-backups.s3.eu-west-1.amazonaws.com");
        assert_eq!(store.host, "dns-backups.s3.eu-west-1.amazonaws.com");
        assert_eq!(
            store.object_path("2024-01-01T00:00:00Z/example.com/example.com.json"),
            "/2024-01-01T00%3A00%3A00Z/example.com/example.com.json"
        );
    }

    #[test]
    fn percent_in_key_is_encoded_once() {
        let store = S3ArchiveStore::new(creds(), "dns-backups").unwrap();
        assert_eq!(
            store.object_path("ts/%5C052.example.com/%5C052.example.com.csv"),
            "/ts/%255C052.example.com/%255C052.example.com.csv"
        );
    }

    #[test]
    fn custom_endpoint_is_path_style() {
        let store = S3ArchiveStore::builder(creds(), "dns-backups")
            .endpoint("http://localhost:9000/")
            .build()
            .unwrap();
        assert_eq!(store.host, "localhost:9000");
        assert_eq!(store.object_path("a/b.csv"), "/dns-backups/a/b.csv");
    }

    #[test]
    fn empty_bucket_is_rejected() {
        let result = S3ArchiveStore::new(creds(), "  ");
        assert!(matches!(
            result,
            Err(ProviderError::InvalidParameter { ref param, .. }) if param == "bucket"
        ));
    }
}
