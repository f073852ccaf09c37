//! S3 `ArchiveStore` trait 实现

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{ProviderError, Result};
use crate::http_client::HttpUtils;
use crate::providers::common::{parse_error_document, sha256_hex};
use crate::traits::{ArchiveStore, ErrorContext, ProviderErrorMapper, RawApiError};

use super::S3ArchiveStore;

/// 按扩展名推断 Content-Type
fn content_type_for(key: &str) -> &'static str {
    match key.rsplit_once('.').map(|(_, ext)| ext) {
        Some("json") => "application/json",
        Some("csv") => "text/csv",
        _ => "application/octet-stream",
    }
}

impl S3ArchiveStore {
    fn handle_response_error(&self, status: u16, response_text: &str) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        let ctx = ErrorContext {
            bucket: Some(self.bucket.clone()),
            status: Some(status),
            ..ErrorContext::default()
        };

        if let Some((code, message)) = parse_error_document(response_text) {
            let message = message.unwrap_or_else(|| format!("HTTP {status}"));
            let raw = match code {
                Some(code) => RawApiError::with_code(code, message),
                None => RawApiError::new(message),
            };
            return Err(self.map_error(raw, ctx));
        }

        Err(self.map_error(
            RawApiError::new(format!("HTTP {status}: {response_text}")),
            ctx,
        ))
    }

    /// 签名并发送 `PutObject`
    async fn put_object(&self, key: &str, body: &[u8], payload_hash: &str) -> Result<()> {
        let canonical_uri = self.object_path(key);
        let signed = self
            .signer
            .sign("PUT", &self.host, &canonical_uri, &[], payload_hash, Utc::now());
        let url = format!("{}{canonical_uri}", self.endpoint);

        let mut request = self
            .client
            .put(&url)
            .header("Content-Type", content_type_for(key))
            .header("X-Amz-Date", &signed.amz_date)
            .header("X-Amz-Content-Sha256", &signed.content_sha256)
            .header("Authorization", &signed.authorization)
            .body(body.to_vec());
        if let Some(token) = &signed.security_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "PUT", &url).await?;

        self.handle_response_error(status, &response_text)
    }
}

#[async_trait]
impl ArchiveStore for S3ArchiveStore {
    fn id(&self) -> &'static str {
        "s3"
    }

    fn target(&self) -> &str {
        &self.bucket
    }

    async fn put_artifact(&self, key: &str, local_path: &Path) -> Result<()> {
        let body = tokio::fs::read(local_path)
            .await
            .map_err(|e| ProviderError::ArtifactUnreadable {
                provider: self.provider_name().to_string(),
                path: local_path.display().to_string(),
                detail: e.to_string(),
            })?;
        let payload_hash = sha256_hex(&body);

        log::debug!(
            "[s3] Uploading {} ({} bytes) to s3://{}/{key}",
            local_path.display(),
            body.len(),
            self.bucket
        );

        self.put_object(key, &body, &payload_hash).await
    }
}
