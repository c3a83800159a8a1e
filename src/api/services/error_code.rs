//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::BiolinkError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 2000-2099: 认证与权限错误
/// - 3000-3099: 资料 / 邀请页错误
/// - 4000-4099: 统计与导出错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    DatabaseError = 1020,
    ServiceUnavailable = 1030,

    // 认证与权限 2000-2099
    TokenInvalid = 2002,
    PremiumRequired = 2010,

    // 资料 / 邀请页 3000-3099
    ValidationFailed = 3000,

    // 统计与导出 4000-4099
    ExportFailed = 4001,
}

impl From<BiolinkError> for ErrorCode {
    fn from(err: BiolinkError) -> Self {
        match err {
            BiolinkError::Validation(_) => ErrorCode::ValidationFailed,
            BiolinkError::DateParse(_) => ErrorCode::InvalidDateFormat,
            BiolinkError::NotFound(_) => ErrorCode::NotFound,
            BiolinkError::Unauthorized(_) => ErrorCode::TokenInvalid,
            BiolinkError::PremiumRequired(_) => ErrorCode::PremiumRequired,
            BiolinkError::Forbidden(_) => ErrorCode::Forbidden,
            BiolinkError::GeoLookup(_) => ErrorCode::ServiceUnavailable,
            BiolinkError::Serialization(_) => ErrorCode::ExportFailed,
            BiolinkError::DatabaseConfig(_)
            | BiolinkError::DatabaseConnection(_)
            | BiolinkError::DatabaseOperation(_) => ErrorCode::DatabaseError,
            BiolinkError::FileOperation(_) => ErrorCode::InternalServerError,
        }
    }
}
