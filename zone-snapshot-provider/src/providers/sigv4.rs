//! AWS Signature Version 4
//! Reference: <https://docs.aws.amazon.com/IAM/latest/UserGuide/reference_sigv-create-signed-request.html>

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::providers::common::{hmac_sha256, sha256_hex};
use crate::types::AwsCredentials;
use crate::utils::log_sanitizer::truncate_for_log;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";

/// Headers to attach to a signed request (besides `Host`, which reqwest sets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SignedHeaders {
    /// `X-Amz-Date`
    pub amz_date: String,
    /// `Authorization`
    pub authorization: String,
    /// `X-Amz-Content-Sha256`
    pub content_sha256: String,
    /// `X-Amz-Security-Token`, for temporary credentials
    pub security_token: Option<String>,
}

/// Signs requests for one service in one region.
#[derive(Debug, Clone)]
pub(crate) struct SigV4Signer {
    credentials: AwsCredentials,
    region: String,
    service: &'static str,
}

impl SigV4Signer {
    pub fn new(credentials: AwsCredentials, region: impl Into<String>, service: &'static str) -> Self {
        Self {
            credentials,
            region: region.into(),
            service,
        }
    }

    /// Signs a request.
    ///
    /// `canonical_uri` must already be URI-encoded; `query` holds the raw
    /// (unencoded) parameters and is encoded and sorted here.
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        canonical_uri: &str,
        query: &[(String, String)],
        payload_hash: &str,
        now: DateTime<Utc>,
    ) -> SignedHeaders {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date = now.format("%Y%m%d").to_string();

        // 1. Canonical query string: encoded, sorted by key then value
        let canonical_query = canonical_query_string(query);

        // 2. Canonical headers (lowercase, sorted)
        let mut headers: Vec<(&str, &str)> = vec![
            ("host", host),
            ("x-amz-content-sha256", payload_hash),
            ("x-amz-date", &amz_date),
        ];
        if let Some(token) = &self.credentials.session_token {
            headers.push(("x-amz-security-token", token));
        }
        headers.sort_by(|a, b| a.0.cmp(b.0));

        let canonical_headers = headers.iter().fold(String::new(), |mut acc, (k, v)| {
            let _ = writeln!(acc, "{k}:{}", v.trim());
            acc
        });
        let signed_headers = headers
            .iter()
            .map(|(k, _)| *k)
            .collect::<Vec<_>>()
            .join(";");

        // 3. Canonical request
        let canonical_request = format!(
            "{method}\n{canonical_uri}\n{canonical_query}\n{canonical_headers}\n{signed_headers}\n{payload_hash}"
        );

        log::debug!("CanonicalRequest:\n{}", truncate_for_log(&canonical_request));

        // 4. String to sign
        let scope = format!("{date}/{}/{}/aws4_request", self.region, self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        log::debug!("StringToSign:\n{string_to_sign}");

        // 5. Signature
        let signing_key = self.signing_key(&date);
        let signature = hex::encode(hmac_sha256(&signing_key, string_to_sign.as_bytes()));

        SignedHeaders {
            authorization: format!(
                "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
                self.credentials.access_key_id
            ),
            amz_date,
            content_sha256: payload_hash.to_string(),
            security_token: self.credentials.session_token.clone(),
        }
    }

    /// Derives the signing key for `date` (`YYYYMMDD`).
    pub fn signing_key(&self, date: &str) -> Vec<u8> {
        let k_secret = format!("AWS4{}", self.credentials.secret_access_key);
        let k_date = hmac_sha256(k_secret.as_bytes(), date.as_bytes());
        let k_region = hmac_sha256(&k_date, self.region.as_bytes());
        let k_service = hmac_sha256(&k_region, self.service.as_bytes());
        hmac_sha256(&k_service, b"aws4_request")
    }
}

/// Encodes and sorts query parameters for signing and for the request URL.
pub(crate) fn canonical_query_string(query: &[(String, String)]) -> String {
    let mut pairs: Vec<(String, String)> = query
        .iter()
        .map(|(k, v)| (uri_encode(k), uri_encode(v)))
        .collect();
    pairs.sort();
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// RFC 3986 encoding of everything except unreserved characters.
pub(crate) fn uri_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

/// Encodes each path segment, keeping the `/` separators.
pub(crate) fn uri_encode_path(path: &str) -> String {
    path.split('/').map(uri_encode).collect::<Vec<_>>().join("/")
}
