use std::sync::Arc;

use async_trait::async_trait;

use crate::analytics::{AnalyticsEvent, NewAnalyticsEvent};
use crate::config::DatabaseConfig;
use crate::errors::Result;

pub mod backend;
pub mod models;

pub use backend::SeaOrmStorage;
pub use models::{
    CatalogueItem, FontChoice, InviteLink, Invitation, MAX_CATALOGUE_ITEMS, Profile, ProfileLink,
    Theme,
};

/// 统计事件存储
///
/// 事件写入后不再修改；按 invite_id 集合批量读取。
#[async_trait]
pub trait EventStore: Send + Sync {
    /// 读取 invite_id 属于给定集合的全部事件，按时间升序
    async fn fetch_events(&self, invite_ids: &[String]) -> Result<Vec<AnalyticsEvent>>;

    /// 追加一条事件，返回带 id 的存储结果
    async fn append_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent>;
}

pub struct StorageFactory;

impl StorageFactory {
    /// 根据数据库配置连接并执行迁移
    pub async fn create(config: &DatabaseConfig) -> Result<Arc<SeaOrmStorage>> {
        let backend_type = backend::infer_backend_from_url(&config.database_url)?;
        let storage = SeaOrmStorage::new(config, &backend_type).await?;
        Ok(Arc::new(storage))
    }
}
