//! 外部 GeoIP API 实现
//!
//! 通过 HTTP API 查询（默认 ip-api.com），结果放入 moka 缓存，
//! 同一 IP 的并发查询只发一次请求。

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use tracing::{trace, warn};
use ureq::Agent;

use super::provider::{GeoInfo, GeoIpLookup};

/// 缓存 TTL（1 小时）
const GEOIP_CACHE_TTL_SECS: u64 = 60 * 60;
const GEOIP_CACHE_MAX_CAPACITY: u64 = 10_000;
const HTTP_TIMEOUT_SECS: u64 = 2;

static HTTP_AGENT: OnceLock<Agent> = OnceLock::new();

fn get_agent() -> &'static Agent {
    HTTP_AGENT.get_or_init(|| {
        Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(HTTP_TIMEOUT_SECS)))
            .build()
            .into()
    })
}

/// 解析 API 响应
///
/// ip-api.com: `{"status":"success","countryCode":"DE","city":"Berlin"}`，
/// 失败时 `{"status":"fail",...}`。也兼容 `country_code` / `country` 字段名。
fn parse_response(json: &serde_json::Value) -> Option<GeoInfo> {
    if json["status"].as_str() == Some("fail") {
        return None;
    }

    let country = ["countryCode", "country_code", "country"]
        .iter()
        .find_map(|key| json[*key].as_str());
    GeoInfo::new(country, json["city"].as_str())
}

/// 外部 API GeoIP Provider
pub struct ExternalApiProvider {
    api_url_template: String,
    /// IP → GeoInfo（None 作为负缓存）
    cache: Cache<String, Option<GeoInfo>>,
}

impl ExternalApiProvider {
    /// `api_url_template` 使用 `{ip}` 作为占位符
    pub fn new(api_url_template: &str) -> Self {
        let cache = Cache::builder()
            .time_to_live(Duration::from_secs(GEOIP_CACHE_TTL_SECS))
            .max_capacity(GEOIP_CACHE_MAX_CAPACITY)
            .build();

        Self {
            api_url_template: api_url_template.to_string(),
            cache,
        }
    }

    /// 同步请求，在 spawn_blocking 中调用
    fn fetch_sync(url: String) -> Option<GeoInfo> {
        let resp = match get_agent().get(&url).call() {
            Ok(r) => r,
            Err(e) => {
                warn!("GeoIP API request to \"{}\" failed: {}", url, e);
                return None;
            }
        };

        let json: serde_json::Value = match resp.into_body().read_json() {
            Ok(j) => j,
            Err(e) => {
                warn!("GeoIP API response from \"{}\" parse failed: {}", url, e);
                return None;
            }
        };

        let geo = parse_response(&json);
        trace!("External API lookup {}: {:?}", url, geo);
        geo
    }

    async fn fetch(&self, ip: &str) -> Option<GeoInfo> {
        let url = self.api_url_template.replace("{ip}", ip);

        tokio::task::spawn_blocking(move || Self::fetch_sync(url))
            .await
            .unwrap_or_else(|e| {
                warn!("GeoIP spawn_blocking failed: {}", e);
                None
            })
    }
}

#[async_trait]
impl GeoIpLookup for ExternalApiProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        // get_with: 同一 key 的并发调用只执行一次
        self.cache
            .get_with(ip.to_string(), async {
                trace!("GeoIP cache miss for {}", ip);
                self.fetch(ip).await
            })
            .await
    }

    fn name(&self) -> &'static str {
        "ExternalAPI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_ip_api_success() {
        let geo = parse_response(&json!({
            "status": "success",
            "countryCode": "DE",
            "city": "Berlin"
        }))
        .unwrap();
        assert_eq!(geo.country.as_deref(), Some("DE"));
        assert_eq!(geo.city.as_deref(), Some("Berlin"));
    }

    #[test]
    fn test_parse_fail_status() {
        assert!(parse_response(&json!({"status": "fail", "message": "private range"})).is_none());
    }

    #[test]
    fn test_parse_alternative_field_names() {
        let geo = parse_response(&json!({"country_code": "US"})).unwrap();
        assert_eq!(geo.country.as_deref(), Some("US"));
        assert!(geo.city.is_none());
        assert!(parse_response(&json!({})).is_none());
        assert!(parse_response(&json!({"countryCode": "", "city": ""})).is_none());
    }

    /// 依赖外部网络服务
    #[tokio::test]
    #[ignore]
    async fn test_external_api_lookup_cached() {
        let provider =
            ExternalApiProvider::new("http://ip-api.com/json/{ip}?fields=status,countryCode,city");

        let first = provider.lookup("8.8.8.8").await;
        assert_eq!(first.as_ref().and_then(|g| g.country.as_deref()), Some("US"));

        let second = provider.lookup("8.8.8.8").await;
        assert_eq!(first, second);
    }
}
