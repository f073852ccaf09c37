//! Route 53 HTTP 请求方法

use chrono::Utc;
use serde::de::DeserializeOwned;

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::providers::common::{parse_error_document, sha256_hex};
use crate::providers::sigv4::canonical_query_string;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Provider;

impl Route53Provider {
    /// 统一处理 Route 53 响应错误
    fn handle_response_error(
        &self,
        status: u16,
        response_text: &str,
        mut ctx: ErrorContext,
    ) -> Result<()> {
        if (200..300).contains(&status) {
            return Ok(());
        }
        ctx.status = Some(status);

        // 尝试解析结构化错误
        if let Some((code, message)) = parse_error_document(response_text) {
            let message = message.unwrap_or_else(|| format!("HTTP {status}"));
            let raw = match code {
                Some(code) => RawApiError::with_code(code, message),
                None => RawApiError::new(message),
            };
            return Err(self.map_error(raw, ctx));
        }

        // 回退到通用错误
        Err(self.map_error(
            RawApiError::new(format!("HTTP {status}: {response_text}")),
            ctx,
        ))
    }

    /// 执行签名 GET 请求并解析 XML 响应
    ///
    /// `path` 为 API 版本之后的路径（如 `/hostedzonesbyname`），需已编码。
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
        ctx: ErrorContext,
    ) -> Result<T> {
        let canonical_uri = format!("/{}{path}", super::API_VERSION);
        let payload_hash = sha256_hex(b"");
        let signed = self.signer.sign(
            "GET",
            &self.host,
            &canonical_uri,
            query,
            &payload_hash,
            Utc::now(),
        );

        let query_string = canonical_query_string(query);
        let url = if query_string.is_empty() {
            format!("{}{canonical_uri}", self.endpoint)
        } else {
            format!("{}{canonical_uri}?{query_string}", self.endpoint)
        };

        let mut request = self
            .client
            .get(&url)
            .header("X-Amz-Date", &signed.amz_date)
            .header("X-Amz-Content-Sha256", &signed.content_sha256)
            .header("Authorization", &signed.authorization);
        if let Some(token) = &signed.security_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        let (status, response_text) =
            HttpUtils::execute_request(request, self.provider_name(), "GET", &url).await?;

        self.handle_response_error(status, &response_text, ctx)?;
        HttpUtils::parse_xml(&response_text, self.provider_name())
    }
}
