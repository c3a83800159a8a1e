//! 请求级会话
//!
//! 由认证中间件根据已校验的 token 构建，放入请求扩展中，请求结束即释放。

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::api::jwt::SessionClaims;
use crate::errors::{BiolinkError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub premium: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn from_claims(claims: SessionClaims, premium: bool) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
            premium,
            expires_at: DateTime::from_timestamp(claims.exp, 0),
        }
    }

    /// premium 专属功能的前置检查
    pub fn require_premium(&self, feature: &str) -> Result<()> {
        if self.premium {
            Ok(())
        } else {
            Err(BiolinkError::premium_required(format!(
                "{} requires a premium account",
                feature
            )))
        }
    }
}
