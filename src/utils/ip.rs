//! 客户端 IP 提取

use std::net::IpAddr;

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;

/// 检查 IP 是否为私有地址或 localhost
pub fn is_private_or_local(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_private() || v4.is_loopback() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            // fc00::/7 (ULA), fe80::/10 (link-local), ::1
            v6.is_loopback()
                || v6.is_unspecified()
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}

/// 是否值得做 GeoIP 查询
pub fn is_public_ip(ip: &str) -> bool {
    ip.parse::<IpAddr>()
        .map(|addr| !is_private_or_local(&addr))
        .unwrap_or(false)
}

/// 从请求头提取转发的 IP（X-Forwarded-For 第一个，其次 X-Real-IP）
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
        })
}

/// 提取真实客户端 IP
///
/// 连接来自私有地址时视为经过反向代理，使用转发头；
/// 公网直连时只信任连接地址。
pub fn extract_client_ip(req: &HttpRequest) -> Option<String> {
    let peer = req.peer_addr().map(|addr| addr.ip());

    match peer {
        Some(ip) if !is_private_or_local(&ip) => Some(ip.to_string()),
        Some(ip) => {
            extract_forwarded_ip_from_headers(req.headers()).or_else(|| Some(ip.to_string()))
        }
        None => extract_forwarded_ip_from_headers(req.headers()),
    }
}
