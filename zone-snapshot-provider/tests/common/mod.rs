//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::env;

use zone_snapshot_provider::{AwsCredentials, HostedZone, Route53Provider, S3ArchiveStore, ZoneListingApi};

/// 跳过测试的宏（当环境变量缺失时）
#[macro_export]
macro_rules! skip_if_no_credentials {
    ($($var:expr),+) => {
        $(
            if std::env::var($var).is_err() {
                eprintln!("跳过测试: 缺少环境变量 {}", $var);
                return;
            }
        )+
    };
}

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 测试上下文 - 封装 Route 53 客户端和测试托管区域
pub struct TestContext {
    pub provider: Route53Provider,
    /// 测试托管区域名称（带或不带末尾的点均可）
    pub zone_name: String,
}

impl TestContext {
    /// 从环境变量创建 Route 53 测试上下文
    pub fn route53() -> Option<Self> {
        let credentials = AwsCredentials::from_env().ok()?;
        let zone_name = env::var("TEST_ZONE").ok()?;
        let provider = Route53Provider::builder(credentials)
            .page_size(2)
            .build()
            .ok()?;

        Some(Self {
            provider,
            zone_name,
        })
    }

    /// 逐页查找测试托管区域
    pub async fn find_zone(&self) -> Option<HostedZone> {
        let wanted = self.zone_name.trim_end_matches('.');
        let mut cursor = None;
        loop {
            let page = self.provider.list_hosted_zones(cursor.as_ref()).await.ok()?;
            if let Some(zone) = page
                .items
                .into_iter()
                .find(|z| z.name_without_dot() == wanted)
            {
                return Some(zone);
            }
            if !page.is_truncated {
                return None;
            }
            cursor = Some(page.next_cursor?);
        }
    }
}

/// 从环境变量创建 S3 归档存储
pub fn s3_store() -> Option<S3ArchiveStore> {
    let credentials = AwsCredentials::from_env().ok()?;
    let bucket = env::var("TEST_BUCKET").ok()?;
    let region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    S3ArchiveStore::builder(credentials, bucket)
        .region(region)
        .build()
        .ok()
}
