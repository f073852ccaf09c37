//! Generic HTTP client tools
//!
//! Reusable request plumbing shared by the Route 53 and S3 clients. Each client
//! signs and builds its own `RequestBuilder`; this module sends it, logs it, and
//! turns transport-level failures into [`ProviderError`]s.
//!
//! Retrying is not done here. Callers wrap whole operations in a
//! [`RetryPolicy`](crate::RetryPolicy) so a fresh signature is computed per attempt.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;

use crate::error::ProviderError;
use crate::utils::log_sanitizer::truncate_for_log;

/// Request plumbing shared by the clients
pub struct HttpUtils;

/// `Retry-After` in seconds; HTTP-date values are ignored.
fn retry_after_secs(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

impl HttpUtils {
    /// Performs an HTTP request and returns the status code and response text
    ///
    /// # Arguments
    /// * `request_builder` - signed request (URL, headers, body)
    /// * `provider_name` - client name (for logging and errors)
    /// * `method_name` - HTTP method (for logging)
    /// * `url_or_action` - URL or API action (for logging)
    ///
    /// # Returns
    /// * `Ok((status_code, response_text))` for any non-throttled, non-gateway response
    /// * `Err(ProviderError::RateLimited)` for HTTP 429
    /// * `Err(ProviderError::NetworkError)` for connection failures and HTTP 502-504
    /// * `Err(ProviderError::Timeout)` when the request timed out
    pub async fn execute_request(
        request_builder: RequestBuilder,
        provider_name: &str,
        method_name: &str,
        url_or_action: &str,
    ) -> Result<(u16, String), ProviderError> {
        let response = request_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            } else {
                ProviderError::NetworkError {
                    provider: provider_name.to_string(),
                    detail: e.to_string(),
                }
            }
        })?;

        let status_code = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        log::debug!("[{provider_name}] {method_name} {url_or_action} -> HTTP {status_code}");

        if status_code == 429 {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] HTTP 429 for {url_or_action}, retry after {retry_after:?}s");
            return Err(ProviderError::RateLimited {
                provider: provider_name.to_string(),
                retry_after,
                raw_message: Some(body),
            });
        }

        if matches!(status_code, 502..=504) {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[{provider_name}] Gateway error HTTP {status_code} for {url_or_action}");
            return Err(ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("HTTP {status_code}: {}", truncate_for_log(&body)),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::NetworkError {
                provider: provider_name.to_string(),
                detail: format!("reading response body: {e}"),
            })?;
        log::debug!("[{provider_name}] body: {}", truncate_for_log(&body));

        Ok((status_code, body))
    }

    /// Parse an XML response body
    ///
    /// # Returns
    /// * `Ok(T)` - successfully parsed
    /// * `Err(ProviderError::ParseError)` - parsing failed
    pub fn parse_xml<T>(response_text: &str, provider_name: &str) -> Result<T, ProviderError>
    where
        T: DeserializeOwned,
    {
        quick_xml::de::from_str(response_text).map_err(|e| {
            log::error!(
                "[{provider_name}] Cannot decode XML ({e}): {}",
                truncate_for_log(response_text)
            );
            ProviderError::ParseError {
                provider: provider_name.to_string(),
                detail: e.to_string(),
            }
        })
    }
}
