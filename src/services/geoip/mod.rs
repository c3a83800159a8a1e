//! 访客 IP 地理位置查询
//!
//! - MaxMind GeoLite2 本地数据库
//! - 外部 HTTP API fallback (默认 ip-api.com)

mod external_api;
mod maxmind;
mod provider;

pub use provider::{GeoInfo, GeoIpLookup, GeoIpProvider};
