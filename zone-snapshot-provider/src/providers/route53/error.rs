//! Route 53 错误映射
//!
//! 参考: <https://docs.aws.amazon.com/Route53/latest/APIReference/CommonErrors.html>
//!
//! ## 错误码分类
//!
//! - **限流 (2)**：Throttling, `PriorRequestNotComplete`
//! - **认证错误 (5)**：`InvalidClientTokenId`, `SignatureDoesNotMatch`, `ExpiredToken`,
//!   `UnrecognizedClientException`, `IncompleteSignature`
//! - **权限拒绝 (2)**：`AccessDenied`, `AccessDeniedException`
//! - **资源不存在 (1)**：`NoSuchHostedZone`
//! - **参数错误 (3)**：`InvalidInput`, `InvalidPaginationToken`, `InvalidArgument`
//! - **服务端错误 (2)**：`ServiceUnavailable`, `InternalFailure`

use crate::error::ProviderError;
use crate::traits::{ErrorContext, ProviderErrorMapper, RawApiError};

use super::Route53Provider;

impl ProviderErrorMapper for Route53Provider {
    fn provider_name(&self) -> &'static str {
        "route53"
    }

    fn map_error(&self, raw: RawApiError, context: ErrorContext) -> ProviderError {
        match raw.code.as_deref() {
            // ============ 限流 ============
            Some("Throttling" | "ThrottlingException" | "PriorRequestNotComplete") => {
                ProviderError::RateLimited {
                    provider: self.provider_name().to_string(),
                    retry_after: None,
                    raw_message: Some(raw.message),
                }
            }

            // ============ 认证错误 ============
            Some(
                "InvalidClientTokenId"
                | "SignatureDoesNotMatch"
                | "ExpiredToken"
                | "UnrecognizedClientException"
                | "IncompleteSignature",
            ) => ProviderError::InvalidCredentials {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 权限拒绝 ============
            Some("AccessDenied" | "AccessDeniedException") => ProviderError::PermissionDenied {
                provider: self.provider_name().to_string(),
                raw_message: Some(raw.message),
            },

            // ============ 托管区域不存在 ============
            Some("NoSuchHostedZone") => ProviderError::ZoneNotFound {
                provider: self.provider_name().to_string(),
                zone_id: context.zone_id.unwrap_or_default(),
                raw_message: Some(raw.message),
            },

            // ============ 参数错误 ============
            Some(code @ ("InvalidInput" | "InvalidPaginationToken" | "InvalidArgument")) => {
                ProviderError::InvalidParameter {
                    provider: self.provider_name().to_string(),
                    param: code.to_string(),
                    detail: raw.message,
                }
            }

            // ============ 服务端错误（可重试） ============
            Some("ServiceUnavailable" | "InternalFailure" | "InternalError") => {
                ProviderError::NetworkError {
                    provider: self.provider_name().to_string(),
                    detail: raw.message,
                }
            }

            // ============ 无错误码：按 HTTP 状态回退 ============
            None if matches!(context.status, Some(500..=599)) => ProviderError::NetworkError {
                provider: self.provider_name().to_string(),
                detail: raw.message,
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
