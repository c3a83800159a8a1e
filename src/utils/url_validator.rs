//! 外链 URL 校验
//!
//! 个人主页链接、邀请页链接、商品链接都只允许 http / https

use url::Url;

use crate::errors::BiolinkError;

#[derive(Debug)]
pub enum UrlValidationError {
    EmptyUrl,
    InvalidProtocol(String),
    DangerousProtocol(String),
    InvalidFormat(String),
}

impl std::fmt::Display for UrlValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUrl => write!(f, "URL cannot be empty"),
            Self::InvalidProtocol(proto) => write!(
                f,
                "Invalid protocol: {}. Only http:// and https:// are allowed",
                proto
            ),
            Self::DangerousProtocol(proto) => write!(f, "Dangerous protocol blocked: {}", proto),
            Self::InvalidFormat(msg) => write!(f, "Invalid URL format: {}", msg),
        }
    }
}

impl std::error::Error for UrlValidationError {}

const DANGEROUS_PROTOCOLS: &[&str] = &["javascript:", "data:", "file:", "vbscript:", "blob:"];

/// 校验 URL，成功时返回去掉首尾空白后的值
pub fn validate_url(url: &str) -> Result<String, UrlValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlValidationError::EmptyUrl);
    }

    let url_lower = url.to_lowercase();
    if let Some(proto) = DANGEROUS_PROTOCOLS.iter().find(|p| url_lower.starts_with(*p)) {
        return Err(UrlValidationError::DangerousProtocol(proto.to_string()));
    }

    if !url_lower.starts_with("http://") && !url_lower.starts_with("https://") {
        let proto = url_lower
            .split(':')
            .next()
            .map(|s| format!("{}:", s))
            .unwrap_or_default();
        return Err(UrlValidationError::InvalidProtocol(proto));
    }

    Url::parse(url).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;
    Ok(url.to_string())
}

/// 校验表单字段中的 URL，错误信息带上字段名
pub fn validate_link_url(field: &str, url: &str) -> Result<String, BiolinkError> {
    validate_url(url).map_err(|e| BiolinkError::validation(format!("{}: {}", field, e)))
}
