//! Route 53 zone listing client

mod error;
mod http;
mod provider;
/// Route 53 API-specific response types.
pub(crate) mod types;

use reqwest::Client;

use crate::error::Result;
use crate::providers::common::{create_http_client, host_of};
use crate::providers::sigv4::SigV4Signer;
use crate::types::AwsCredentials;

/// Route 53 API host.
pub(crate) const ROUTE53_HOST: &str = "route53.amazonaws.com";
/// Route 53 is a global service signed in `us-east-1`.
pub(crate) const ROUTE53_SIGNING_REGION: &str = "us-east-1";
/// API version path prefix.
pub(crate) const API_VERSION: &str = "2013-04-01";
/// Largest page the listing endpoints accept.
pub(crate) const MAX_PAGE_SIZE: u32 = 300;

/// Route 53 listing client.
///
/// Authenticates via AWS Signature Version 4. Each call returns one page;
/// aggregation is left to the caller.
///
/// # Construction
///
/// ```rust,no_run
/// use zone_snapshot_provider::{AwsCredentials, Route53Provider};
///
/// # fn main() -> zone_snapshot_provider::Result<()> {
/// let provider = Route53Provider::new(AwsCredentials::new("AKID...", "secret"))?;
/// # Ok(())
/// # }
/// ```
pub struct Route53Provider {
    pub(crate) client: Client,
    pub(crate) signer: SigV4Signer,
    pub(crate) endpoint: String,
    pub(crate) host: String,
    pub(crate) page_size: Option<u32>,
}

/// Builder for [`Route53Provider`].
pub struct Route53ProviderBuilder {
    credentials: AwsCredentials,
    endpoint: Option<String>,
    page_size: Option<u32>,
}

impl Route53ProviderBuilder {
    fn new(credentials: AwsCredentials) -> Self {
        Self {
            credentials,
            endpoint: None,
            page_size: None,
        }
    }

    /// Override the API endpoint (scheme + host, e.g. `http://localhost:4566`).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Request at most `size` items per page (clamped to `1..=300`).
    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size.clamp(1, MAX_PAGE_SIZE));
        self
    }

    /// Build the [`Route53Provider`] instance.
    pub fn build(self) -> Result<Route53Provider> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| format!("https://{ROUTE53_HOST}"))
            .trim_end_matches('/')
            .to_string();
        let host = host_of(&endpoint).to_string();

        Ok(Route53Provider {
            client: create_http_client("route53")?,
            signer: SigV4Signer::new(self.credentials, ROUTE53_SIGNING_REGION, "route53"),
            endpoint,
            host,
            page_size: self.page_size,
        })
    }
}

impl Route53Provider {
    /// Creates a client against the public Route 53 endpoint.
    pub fn new(credentials: AwsCredentials) -> Result<Self> {
        Self::builder(credentials).build()
    }

    /// Returns a builder for customizing the client configuration.
    pub fn builder(credentials: AwsCredentials) -> Route53ProviderBuilder {
        Route53ProviderBuilder::new(credentials)
    }
}
