//! S3 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/AmazonS3/latest/API/ErrorResponses.html>

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::S3ArchiveStore;

impl ProviderErrorMapper for S3ArchiveStore {
    fn provider_name(&self) -> &'static str {
        "s3"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ 限流 ============
            Some("SlowDown" | "Throttling" | "RequestLimitExceeded") => {
                ProviderError::RateLimited {
                    provider: self.provider_name().to_string(),
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 超时 ============
            Some("RequestTimeout") => ProviderError::Timeout {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },

            // ============ 认证错误 ============
            Some(
                "InvalidAccessKeyId"
                | "SignatureDoesNotMatch"
                | "ExpiredToken"
                | "InvalidToken"
                | "TokenRefreshRequired",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 权限拒绝 ============
            Some("AccessDenied" | "AllAccessDisabled" | "AccountProblem") => {
                ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            // ============ Bucket 不存在 ============
            Some("NoSuchBucket") => ProviderError::BucketNotFound {
                provider: self.provider_name().to_string(),
                bucket: context.bucket.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 参数错误 ============
            Some("PermanentRedirect" | "AuthorizationHeaderMalformed") => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: "region".to_string(),
                    detail: raw.message,
                }
            }
            Some(
                code @ ("InvalidBucketName"
                | "KeyTooLongError"
                | "EntityTooLarge"
                | "InvalidArgument"
                | "InvalidRequest"),
            ) => ProviderError::InvalidParameter {
                provider: self.provider_name().to_string(),
                param: code.to_string(),
                detail: raw.message,
            },

            // ============ 服务端错误（可重试） ============
            Some("InternalError" | "ServiceUnavailable") => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },

            // ============ 无错误码：按 HTTP 状态回退 ============
            None if matches!(context.status, Some(500..=599)) => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
            },
            None if matches!(context.status, Some(404)) => ProviderError::BucketNotFound {
                provider: self.provider_name().to_string(),
                bucket: context.bucket.unwrap_or_default(),
                raw_message: Some(raw.message),
            },
            None if matches!(context.status, Some(401 | 403)) => {
                ProviderError::PermissionDenied {
                    provider: self.provider_name().to_string(),
                    raw_message: Some(raw.message),
                }
            }

            _ => self.unknown_error(raw),
        }
    }
}
