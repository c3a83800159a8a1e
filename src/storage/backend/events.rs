//! EventStore implementation for SeaOrmStorage

use async_trait::async_trait;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::{trace, warn};

use super::SeaOrmStorage;
use super::converters::{model_to_event, new_event_to_active_model};
use super::retry;
use crate::analytics::{AnalyticsEvent, NewAnalyticsEvent};
use crate::errors::{BiolinkError, Result};
use crate::storage::EventStore;

use migration::entities::invitation_analytics;

#[async_trait]
impl EventStore for SeaOrmStorage {
    async fn fetch_events(&self, invite_ids: &[String]) -> Result<Vec<AnalyticsEvent>> {
        if invite_ids.is_empty() {
            return Ok(Vec::new());
        }

        let db = &self.db;
        let models = retry::with_retry("fetch_events", self.retry_config, || async {
            invitation_analytics::Entity::find()
                .filter(invitation_analytics::Column::InviteId.is_in(invite_ids.iter().cloned()))
                .order_by_asc(invitation_analytics::Column::Timestamp)
                .all(db)
                .await
        })
        .await?;

        let total = models.len();
        let events: Vec<AnalyticsEvent> = models.into_iter().filter_map(model_to_event).collect();
        if events.len() != total {
            warn!(
                "Skipped {} analytics rows with unknown event type",
                total - events.len()
            );
        }
        Ok(events)
    }

    async fn append_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        let id = uuid::Uuid::new_v4().to_string();
        let db = &self.db;

        retry::with_retry(
            &format!("append_event({})", event.invite_id),
            self.retry_config,
            || async {
                invitation_analytics::Entity::insert(new_event_to_active_model(&id, &event))
                    .exec_without_returning(db)
                    .await
            },
        )
        .await
        .map_err(|e| BiolinkError::database_operation(format!("写入统计事件失败: {}", e)))?;

        trace!(
            "Recorded {} event {} for {}",
            event.event_type, id, event.invite_id
        );

        Ok(AnalyticsEvent {
            id,
            invite_id: event.invite_id,
            timestamp: event.timestamp,
            event_type: event.event_type,
            location: event.location,
            device: event.device,
            referral: event.referral,
        })
    }
}
