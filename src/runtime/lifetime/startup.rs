use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::analytics::EventRecorder;
use crate::api::jwt::JwtVerifier;
use crate::config::StaticConfig;
use crate::services::{AnalyticsService, InvitationService, ProfileService};
use crate::storage::{EventStore, SeaOrmStorage, StorageFactory};

/// 服务器运行所需的共享组件
#[derive(Clone)]
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub jwt: Arc<JwtVerifier>,
    pub profile_service: ProfileService,
    pub invitation_service: InvitationService,
    pub analytics_service: AnalyticsService,
    pub recorder: EventRecorder,
}

impl StartupContext {
    /// 在已有存储之上组装服务（集成测试也走这里）
    pub fn build(storage: Arc<SeaOrmStorage>, config: &StaticConfig) -> Result<Self> {
        let jwt = JwtVerifier::from_config(&config.auth)
            .context("Failed to initialize token verifier")?;

        let events: Arc<dyn EventStore> = storage.clone();
        let public_base_url = config.site.public_base_url.clone();

        let recorder = EventRecorder::from_config(events.clone(), &config.analytics);
        if !recorder.is_enabled() {
            warn!("Analytics recording is disabled in configuration");
        }

        Ok(Self {
            profile_service: ProfileService::new(storage.clone()),
            invitation_service: InvitationService::new(storage.clone(), public_base_url.clone()),
            analytics_service: AnalyticsService::new(
                storage.clone(),
                events,
                public_base_url,
                config.analytics.export_time_format.clone(),
            ),
            recorder,
            jwt: Arc::new(jwt),
            storage,
        })
    }
}

/// 准备服务器启动的上下文：连接数据库、执行迁移、组装服务
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = StartupContext::build(storage, config)?;

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}
