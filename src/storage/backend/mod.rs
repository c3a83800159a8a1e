//! SeaORM storage backend
//!
//! Profiles, invitations and analytics events on SQLite, MySQL/MariaDB or
//! PostgreSQL.

mod connection;
mod converters;
mod events;
mod invitations;
mod profiles;
pub mod retry;

use sea_orm::DatabaseConnection;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::errors::{BiolinkError, Result};

pub use connection::{connect_generic, connect_sqlite, run_migrations};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite:")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(BiolinkError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    /// 连接数据库并执行迁移
    pub async fn new(config: &DatabaseConfig, backend_name: &str) -> Result<Self> {
        if config.database_url.is_empty() {
            return Err(BiolinkError::database_config("database_url 未设置"));
        }

        let db = if backend_name == "sqlite" {
            connect_sqlite(&config.database_url).await?
        } else {
            connect_generic(
                &config.database_url,
                backend_name,
                config.pool_size,
                config.timeout,
            )
            .await?
        };

        run_migrations(&db).await?;

        let storage = Self {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::from(config),
        };
        info!("{} storage initialized", storage.backend_name.to_uppercase());
        Ok(storage)
    }

    /// 使用已建立（且已迁移）的连接
    pub fn from_connection(db: DatabaseConnection, backend_name: &str) -> Self {
        Self {
            db,
            backend_name: backend_name.to_string(),
            retry_config: retry::RetryConfig::default(),
        }
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }
}
