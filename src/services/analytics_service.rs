//! Analytics service
//!
//! 仪表盘汇总、单个邀请页的原始事件与 CSV 导出。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use tracing::warn;

use crate::analytics::export::{export_events_csv, export_filename};
use crate::analytics::{AnalyticsEvent, DailyBucket, EventTotals, last_seven_days};
use crate::errors::{BiolinkError, Result};
use crate::session::Session;
use crate::storage::{EventStore, Invitation, SeaOrmStorage};

/// 仪表盘中一行
#[derive(Debug, Clone, Serialize)]
pub struct InvitationSummary {
    pub id: String,
    pub title: String,
    pub invite_url: String,
    pub views: u64,
    pub clicks: u64,
    pub daily: Vec<DailyBucket>,
}

/// 单个邀请页的明细（premium）
#[derive(Debug, Clone, Serialize)]
pub struct InvitationAnalytics {
    pub invitation_id: String,
    pub title: String,
    pub totals: EventTotals,
    pub daily: Vec<DailyBucket>,
    pub events: Vec<AnalyticsEvent>,
}

/// CSV 导出结果
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub content: Vec<u8>,
}

#[derive(Clone)]
pub struct AnalyticsService {
    storage: Arc<SeaOrmStorage>,
    events: Arc<dyn EventStore>,
    public_base_url: String,
    export_time_format: String,
}

impl AnalyticsService {
    pub fn new(
        storage: Arc<SeaOrmStorage>,
        events: Arc<dyn EventStore>,
        public_base_url: impl Into<String>,
        export_time_format: impl Into<String>,
    ) -> Self {
        Self {
            storage,
            events,
            public_base_url: public_base_url.into(),
            export_time_format: export_time_format.into(),
        }
    }

    /// 当前用户所有邀请页的汇总，`now` 决定 7 天窗口及其时区
    ///
    /// 读取失败不返回错误：邀请页列表失败时为空列表，事件失败时按无事件处理。
    pub async fn dashboard<Tz: TimeZone>(
        &self,
        session: &Session,
        now: &DateTime<Tz>,
    ) -> Result<Vec<InvitationSummary>> {
        let invitations = match self.storage.list_invitations(&session.user_id).await {
            Ok(invitations) => invitations,
            Err(e) => {
                warn!("Failed to list invitations of {}: {}", session.user_id, e);
                return Ok(Vec::new());
            }
        };
        if invitations.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = invitations.iter().map(|inv| inv.id.clone()).collect();
        let events = match self.events.fetch_events(&ids).await {
            Ok(events) => events,
            Err(e) => {
                warn!(
                    "Failed to fetch analytics for {} invitations of {}: {}",
                    ids.len(),
                    session.user_id,
                    e
                );
                Vec::new()
            }
        };

        let mut by_invite: HashMap<&str, Vec<&AnalyticsEvent>> = HashMap::new();
        for event in &events {
            by_invite
                .entry(event.invite_id.as_str())
                .or_default()
                .push(event);
        }

        Ok(invitations
            .iter()
            .map(|inv| {
                let own = by_invite.get(inv.id.as_str()).map(Vec::as_slice).unwrap_or(&[]);
                let totals = EventTotals::from_events(own.iter().copied());
                InvitationSummary {
                    id: inv.id.clone(),
                    title: inv.title.clone(),
                    invite_url: inv.invite_url(&self.public_base_url),
                    views: totals.views,
                    clicks: totals.clicks,
                    daily: last_seven_days(now, own.iter().copied()),
                }
            })
            .collect())
    }

    pub async fn invite_detail<Tz: TimeZone>(
        &self,
        session: &Session,
        invite_id: &str,
        now: &DateTime<Tz>,
    ) -> Result<InvitationAnalytics> {
        session.require_premium("Detailed analytics")?;
        let (invitation, events) = self.owned_events(session, invite_id).await?;

        Ok(InvitationAnalytics {
            invitation_id: invitation.id,
            title: invitation.title,
            totals: EventTotals::from_events(&events),
            daily: last_seven_days(now, &events),
            events,
        })
    }

    /// 导出为 CSV，时间按 `tz` 渲染
    pub async fn export_csv<Tz>(
        &self,
        session: &Session,
        invite_id: &str,
        tz: &Tz,
    ) -> Result<CsvExport>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        session.require_premium("CSV export")?;
        let (invitation, events) = self.owned_events(session, invite_id).await?;

        let content = export_events_csv(&events, tz, &self.export_time_format)?;
        Ok(CsvExport {
            filename: export_filename(&invitation.title),
            content,
        })
    }

    async fn owned_events(
        &self,
        session: &Session,
        invite_id: &str,
    ) -> Result<(Invitation, Vec<AnalyticsEvent>)> {
        let invitation = match self.storage.get_invitation(invite_id).await? {
            Some(inv) if inv.user_id == session.user_id => inv,
            _ => {
                return Err(BiolinkError::not_found(format!(
                    "Invitation not found: {}",
                    invite_id
                )));
            }
        };
        let events = self
            .events
            .fetch_events(std::slice::from_ref(&invitation.id))
            .await?;
        Ok((invitation, events))
    }
}
