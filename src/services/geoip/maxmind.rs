//! MaxMind GeoLite2 本地数据库实现

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use maxminddb::Reader;
use tracing::trace;

use super::provider::{GeoInfo, GeoIpLookup};

pub struct MaxMindProvider {
    reader: Arc<Reader<Vec<u8>>>,
}

impl MaxMindProvider {
    /// 打开 GeoLite2-City.mmdb
    pub fn new(path: &str) -> Result<Self, maxminddb::MaxMindDbError> {
        let reader = Reader::open_readfile(path)?;
        Ok(Self {
            reader: Arc::new(reader),
        })
    }
}

#[async_trait]
impl GeoIpLookup for MaxMindProvider {
    async fn lookup(&self, ip: &str) -> Option<GeoInfo> {
        let ip_addr: IpAddr = ip.parse().ok()?;
        let result = self.reader.lookup(ip_addr).ok()?;
        let record: maxminddb::geoip2::City = result.decode().ok()??;

        // 只取英文城市名，和外部 API 返回的一致
        let city = record.city.names.english.map(|s| s.to_string());
        let geo = GeoInfo::new(record.country.iso_code, city.as_deref());
        trace!("MaxMind {} -> {:?}", ip, geo);
        geo
    }

    fn name(&self) -> &'static str {
        "MaxMind"
    }
}
