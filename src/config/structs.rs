use std::path::Path;

use serde::{Deserialize, Serialize};

/// 静态配置（从 TOML 加载，启动时使用）
///
/// - server: 服务器地址、端口、CPU 数量
/// - database: 数据库连接配置
/// - logging: 日志配置
/// - auth: 外部身份服务签发的 JWT 校验参数
/// - site: 对外访问地址、CORS
/// - analytics: 事件记录、GeoIP、CSV 导出
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StaticConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

impl StaticConfig {
    /// 从 config.toml 和环境变量加载配置
    pub fn load() -> Self {
        Self::load_from(Path::new("config.toml"))
    }

    /// 从指定 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > TOML > 默认值
    /// ENV 前缀：BL，分隔符：__
    /// 示例：BL__SERVER__PORT=9999
    pub fn load_from(path: &Path) -> Self {
        use config::{Config, Environment, File};

        let builder = Config::builder()
            // 1. 从 TOML 文件加载（可选）
            .add_source(File::from(path).required(false))
            // 2. 从环境变量覆盖，前缀 BL，分隔符 __
            .add_source(
                Environment::with_prefix("BL")
                    .separator("__")
                    .try_parsing(true),
            );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<StaticConfig>() {
                Ok(config) => {
                    if path.exists() {
                        eprintln!("[INFO] Configuration loaded from: {}", path.display());
                    }
                    config
                }
                Err(e) => {
                    eprintln!("[ERROR] Failed to deserialize config: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("[ERROR] Failed to build config: {}", e);
                Self::default()
            }
        }
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    #[serde(default = "default_cpu_count")]
    pub cpu_count: usize,
}

/// 数据库连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_database_pool_size")]
    pub pool_size: u32,
    #[serde(default = "default_database_timeout")]
    pub timeout: u64,
    /// 可重试错误（锁冲突、断线）的最大重试次数
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_retry_max_delay_ms")]
    pub retry_max_delay_ms: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// "text" | "json"
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default = "default_enable_rotation")]
    pub enable_rotation: bool,
}

/// 外部身份服务 JWT 校验配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 共享密钥（身份服务的 JWT secret）
    #[serde(default)]
    pub jwt_secret: String,
    /// 期望的 `aud` claim，留空则不校验
    #[serde(default = "default_jwt_audience")]
    pub audience: String,
    /// 过期校验的容差（秒）
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

/// 站点配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// 生成邀请页链接时使用的外部地址
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,
    /// 允许跨域的前端来源，空列表表示仅同源
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

/// 分析统计配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// 是否记录浏览/点击事件
    #[serde(default = "default_true")]
    pub enable_recording: bool,

    /// 是否对访客 IP 做地理位置查询
    #[serde(default)]
    pub enable_geo_lookup: bool,

    /// MaxMindDB 文件路径 (GeoLite2-City.mmdb)
    /// 如果配置且文件可读，使用本地解析；否则 fallback 到外部 API
    #[serde(default)]
    pub maxminddb_path: Option<String>,

    /// 外部 GeoIP API URL (fallback)
    /// 使用 {ip} 作为占位符，例如: http://ip-api.com/json/{ip}?fields=countryCode,city
    #[serde(default = "default_geoip_api_url")]
    pub geoip_api_url: String,

    /// CSV 导出中 Time 列的格式（本地时区）
    #[serde(default = "default_export_time_format")]
    pub export_time_format: String,
}

// ============================================================
// Default value functions
// ============================================================

fn default_true() -> bool {
    true
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_cpu_count() -> usize {
    num_cpus::get()
}

fn default_database_url() -> String {
    "sqlite://biolink.db".to_string()
}

fn default_database_pool_size() -> u32 {
    10
}

fn default_database_timeout() -> u64 {
    30
}

fn default_retry_count() -> u32 {
    3
}

fn default_retry_base_delay_ms() -> u64 {
    100
}

fn default_retry_max_delay_ms() -> u64 {
    2000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

fn default_enable_rotation() -> bool {
    true
}

fn default_jwt_audience() -> String {
    "authenticated".to_string()
}

fn default_jwt_leeway() -> u64 {
    30
}

fn default_public_base_url() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_geoip_api_url() -> String {
    "http://ip-api.com/json/{ip}?fields=status,countryCode,city".to_string()
}

fn default_export_time_format() -> String {
    crate::analytics::export::DEFAULT_TIME_FORMAT.to_string()
}

// ============================================================
// Default implementations
// ============================================================

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            cpu_count: default_cpu_count(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            pool_size: default_database_pool_size(),
            timeout: default_database_timeout(),
            retry_count: default_retry_count(),
            retry_base_delay_ms: default_retry_base_delay_ms(),
            retry_max_delay_ms: default_retry_max_delay_ms(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: default_enable_rotation(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            audience: default_jwt_audience(),
            leeway_secs: default_jwt_leeway(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            public_base_url: default_public_base_url(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            enable_recording: default_true(),
            enable_geo_lookup: false,
            maxminddb_path: None,
            geoip_api_url: default_geoip_api_url(),
            export_time_format: default_export_time_format(),
        }
    }
}
