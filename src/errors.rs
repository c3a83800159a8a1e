use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum BiolinkError {
    DatabaseConfig(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    FileOperation(String),
    Validation(String),
    NotFound(String),
    Serialization(String),
    DateParse(String),
    Unauthorized(String),
    PremiumRequired(String),
    Forbidden(String),
    GeoLookup(String),
}

impl BiolinkError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            BiolinkError::DatabaseConfig(_) => "E001",
            BiolinkError::DatabaseConnection(_) => "E002",
            BiolinkError::DatabaseOperation(_) => "E003",
            BiolinkError::FileOperation(_) => "E004",
            BiolinkError::Validation(_) => "E005",
            BiolinkError::NotFound(_) => "E006",
            BiolinkError::Serialization(_) => "E007",
            BiolinkError::DateParse(_) => "E008",
            BiolinkError::Unauthorized(_) => "E009",
            BiolinkError::PremiumRequired(_) => "E010",
            BiolinkError::Forbidden(_) => "E011",
            BiolinkError::GeoLookup(_) => "E012",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            BiolinkError::DatabaseConfig(_) => "Database Configuration Error",
            BiolinkError::DatabaseConnection(_) => "Database Connection Error",
            BiolinkError::DatabaseOperation(_) => "Database Operation Error",
            BiolinkError::FileOperation(_) => "File Operation Error",
            BiolinkError::Validation(_) => "Validation Error",
            BiolinkError::NotFound(_) => "Resource Not Found",
            BiolinkError::Serialization(_) => "Serialization Error",
            BiolinkError::DateParse(_) => "Date Parse Error",
            BiolinkError::Unauthorized(_) => "Unauthorized",
            BiolinkError::PremiumRequired(_) => "Premium Required",
            BiolinkError::Forbidden(_) => "Forbidden",
            BiolinkError::GeoLookup(_) => "GeoIP Lookup Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            BiolinkError::DatabaseConfig(msg)
            | BiolinkError::DatabaseConnection(msg)
            | BiolinkError::DatabaseOperation(msg)
            | BiolinkError::FileOperation(msg)
            | BiolinkError::Validation(msg)
            | BiolinkError::NotFound(msg)
            | BiolinkError::Serialization(msg)
            | BiolinkError::DateParse(msg)
            | BiolinkError::Unauthorized(msg)
            | BiolinkError::PremiumRequired(msg)
            | BiolinkError::Forbidden(msg)
            | BiolinkError::GeoLookup(msg) => msg,
        }
    }

    /// 映射到 HTTP 状态码
    pub fn http_status(&self) -> StatusCode {
        match self {
            BiolinkError::Validation(_) | BiolinkError::DateParse(_) => StatusCode::BAD_REQUEST,
            BiolinkError::NotFound(_) => StatusCode::NOT_FOUND,
            BiolinkError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            BiolinkError::PremiumRequired(_) | BiolinkError::Forbidden(_) => StatusCode::FORBIDDEN,
            BiolinkError::GeoLookup(_) => StatusCode::BAD_GATEWAY,
            BiolinkError::DatabaseConfig(_)
            | BiolinkError::DatabaseConnection(_)
            | BiolinkError::DatabaseOperation(_)
            | BiolinkError::FileOperation(_)
            | BiolinkError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 格式化为彩色输出（用于 Server 模式启动失败）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for BiolinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 默认使用简洁格式
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for BiolinkError {}

// 便捷的构造函数
impl BiolinkError {
    pub fn database_config<T: Into<String>>(msg: T) -> Self {
        BiolinkError::DatabaseConfig(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        BiolinkError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        BiolinkError::DatabaseOperation(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        BiolinkError::FileOperation(msg.into())
    }

    pub fn validation<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Validation(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        BiolinkError::NotFound(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Serialization(msg.into())
    }

    pub fn date_parse<T: Into<String>>(msg: T) -> Self {
        BiolinkError::DateParse(msg.into())
    }

    pub fn unauthorized<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Unauthorized(msg.into())
    }

    pub fn premium_required<T: Into<String>>(msg: T) -> Self {
        BiolinkError::PremiumRequired(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        BiolinkError::Forbidden(msg.into())
    }

    pub fn geo_lookup<T: Into<String>>(msg: T) -> Self {
        BiolinkError::GeoLookup(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for BiolinkError {
    fn from(err: sea_orm::DbErr) -> Self {
        BiolinkError::DatabaseOperation(err.to_string())
    }
}

impl From<std::io::Error> for BiolinkError {
    fn from(err: std::io::Error) -> Self {
        BiolinkError::FileOperation(err.to_string())
    }
}

impl From<serde_json::Error> for BiolinkError {
    fn from(err: serde_json::Error) -> Self {
        BiolinkError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for BiolinkError {
    fn from(err: chrono::ParseError) -> Self {
        BiolinkError::DateParse(err.to_string())
    }
}

impl From<csv::Error> for BiolinkError {
    fn from(err: csv::Error) -> Self {
        BiolinkError::Serialization(format!("CSV error: {}", err))
    }
}

impl From<jsonwebtoken::errors::Error> for BiolinkError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        BiolinkError::Unauthorized(format!("Invalid token: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, BiolinkError>;
