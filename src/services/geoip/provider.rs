//! GeoIP Provider 抽象层
//!
//! 根据配置选择实现：
//! 1. maxminddb_path 已配置且可读 → MaxMindProvider
//! 2. 否则 → ExternalApiProvider

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::external_api::ExternalApiProvider;
use super::maxmind::MaxMindProvider;
use crate::config::AnalyticsConfig;

/// 地理位置信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoInfo {
    /// ISO 3166-1 alpha-2 国家代码 (e.g., "DE", "US")
    pub country: Option<String>,
    pub city: Option<String>,
}

impl GeoInfo {
    /// 空白字段视为缺失，两者都缺失时返回 None
    pub fn new(country: Option<&str>, city: Option<&str>) -> Option<Self> {
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        let geo = Self {
            country: clean(country).map(|c| c.to_ascii_uppercase()),
            city: clean(city),
        };
        (geo.country.is_some() || geo.city.is_some()).then_some(geo)
    }

    /// 统计事件中的 location 字段："City, CC" / "CC" / "City" / ""
    pub fn location_label(&self) -> String {
        match (self.city.as_deref(), self.country.as_deref()) {
            (Some(city), Some(country)) => format!("{}, {}", city, country),
            (None, Some(label)) | (Some(label), None) => label.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// GeoIP 查询 trait
#[async_trait]
pub trait GeoIpLookup: Send + Sync {
    /// 查询 IP 地址的地理位置，失败返回 None
    async fn lookup(&self, ip: &str) -> Option<GeoInfo>;

    /// provider 名称（用于日志）
    fn name(&self) -> &'static str;
}

/// 统一 GeoIP Provider
#[derive(Clone)]
pub struct GeoIpProvider {
    inner: Arc<dyn GeoIpLookup>,
}

impl GeoIpProvider {
    /// 根据 AnalyticsConfig 初始化
    pub fn new(config: &AnalyticsConfig) -> Self {
        let inner: Arc<dyn GeoIpLookup> = match config.maxminddb_path.as_deref() {
            Some(path) if !path.is_empty() => match MaxMindProvider::new(path) {
                Ok(provider) => {
                    info!("GeoIP: Using MaxMind database at {}", path);
                    Arc::new(provider)
                }
                Err(e) => {
                    warn!(
                        "GeoIP: Failed to load MaxMind database at {}: {}, falling back to external API",
                        path, e
                    );
                    Arc::new(ExternalApiProvider::new(&config.geoip_api_url))
                }
            },
            _ => {
                debug!("GeoIP: No MaxMind database configured, using external API");
                Arc::new(ExternalApiProvider::new(&config.geoip_api_url))
            }
        };

        info!("GeoIP: Initialized with {} provider", inner.name());
        Self { inner }
    }

    /// 使用自定义实现
    pub fn from_lookup(inner: Arc<dyn GeoIpLookup>) -> Self {
        Self { inner }
    }

    pub async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        self.inner.lookup(ip).await
    }

    /// 查询并直接格式化为 location 字段，失败时为空串
    pub async fn location_for(&self, ip: &str) -> String {
        self.lookup(ip)
            .await
            .map(|geo| geo.location_label())
            .unwrap_or_default()
    }

    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }
}
