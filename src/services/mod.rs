//! Service layer for business logic
//!
//! HTTP handler 只负责解析请求与组装响应，校验、权限与聚合都在这里完成。

mod analytics_service;
pub mod geoip;
mod invitation_service;
mod profile_service;

pub use analytics_service::*;
pub use geoip::{GeoInfo, GeoIpLookup, GeoIpProvider};
pub use invitation_service::*;
pub use profile_service::*;
