//! 客户端公共工具函数

use std::time::Duration;

use hmac::{Hmac, Mac};
use reqwest::Client;
use sha2::{Digest, Sha256};

use crate::error::{ProviderError, Result};

type HmacSha256 = Hmac<Sha256>;

// ============ HTTP Client ============

/// 默认连接超时（秒）
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
/// 默认请求超时（秒）
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// 创建带超时配置的 HTTP Client
pub fn create_http_client(provider: &str) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| ProviderError::NetworkError {
            provider: provider.to_string(),
            detail: format!("Failed to create HTTP client: {e}"),
        })
}

/// 从 `scheme://host[:port]` 形式的 endpoint 中取出 host（含端口）
pub fn host_of(endpoint: &str) -> &str {
    let without_scheme = endpoint
        .split_once("://")
        .map_or(endpoint, |(_, rest)| rest);
    without_scheme.split('/').next().unwrap_or(without_scheme)
}

// ============ HMAC-SHA256 ============

/// HMAC-SHA256 计算（SigV4 签名密钥派生与签名）
pub fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// SHA-256 十六进制摘要
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

// ============ 错误响应解析 ============

/// 从 XML 错误响应中提取 `<Code>` 与 `<Message>`
///
/// Route 53 包裹在 `<ErrorResponse><Error>` 中，S3 直接使用 `<Error>`。
pub fn parse_error_document(body: &str) -> Option<(Option<String>, Option<String>)> {
    #[derive(serde::Deserialize)]
    struct ErrorBody {
        #[serde(rename = "Code")]
        code: Option<String>,
        #[serde(rename = "Message")]
        message: Option<String>,
    }

    #[derive(serde::Deserialize)]
    struct Wrapped {
        #[serde(rename = "Error")]
        error: ErrorBody,
    }

    if let Ok(wrapped) = quick_xml::de::from_str::<Wrapped>(body) {
        return Some((wrapped.error.code, wrapped.error.message));
    }
    quick_xml::de::from_str::<ErrorBody>(body)
        .ok()
        .filter(|e| e.code.is_some() || e.message.is_some())
        .map(|e| (e.code, e.message))
}
