//! 统计接口
//!
//! 7 天窗口与 CSV 时间按请求给出的 `tz_offset`（相对 UTC 的分钟数）计算，
//! 未给出或超出范围时使用服务器本地时区。

use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::web::ReqData;
use actix_web::{HttpResponse, Responder, web};
use chrono::{FixedOffset, Local, Offset, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::services::AnalyticsService;
use crate::session::Session;

use super::helpers::{api_result, error_from_biolink};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TimezoneQuery {
    /// 东为正，例如 UTC+8 为 480
    pub tz_offset: Option<i32>,
}

impl TimezoneQuery {
    pub fn offset(&self) -> FixedOffset {
        let requested = self
            .tz_offset
            .and_then(|minutes| minutes.checked_mul(60))
            .and_then(FixedOffset::east_opt);

        match (requested, self.tz_offset) {
            (Some(offset), _) => offset,
            (None, Some(minutes)) => {
                debug!("tz_offset {} out of range, using local time zone", minutes);
                Local::now().offset().fix()
            }
            (None, None) => Local::now().offset().fix(),
        }
    }
}

/// GET /api/v1/analytics
pub async fn get_dashboard(
    session: ReqData<Session>,
    analytics: web::Data<AnalyticsService>,
    query: web::Query<TimezoneQuery>,
) -> impl Responder {
    let now = Utc::now().with_timezone(&query.offset());
    api_result(analytics.dashboard(&session, &now).await)
}

/// GET /api/v1/invitations/{id}/analytics
pub async fn get_invitation_analytics(
    session: ReqData<Session>,
    analytics: web::Data<AnalyticsService>,
    path: web::Path<String>,
    query: web::Query<TimezoneQuery>,
) -> impl Responder {
    let now = Utc::now().with_timezone(&query.offset());
    api_result(
        analytics
            .invite_detail(&session, &path.into_inner(), &now)
            .await,
    )
}

/// GET /api/v1/invitations/{id}/analytics/export
pub async fn export_invitation_analytics(
    session: ReqData<Session>,
    analytics: web::Data<AnalyticsService>,
    path: web::Path<String>,
    query: web::Query<TimezoneQuery>,
) -> impl Responder {
    let offset = query.offset();
    match analytics
        .export_csv(&session, &path.into_inner(), &offset)
        .await
    {
        Ok(export) => HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/csv; charset=utf-8"))
            .insert_header((
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ))
            .body(export.content),
        Err(e) => error_from_biolink(&e),
    }
}
