//! view / click 事件记录
//!
//! 请求数据在 handler 内同步提取，写入在独立的 tokio task 中完成，
//! 失败只记日志，不影响访客请求。

use std::sync::Arc;

use actix_web::HttpRequest;
use actix_web::http::header;
use chrono::Utc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::classifier::classify_device;
use super::{EventType, NewAnalyticsEvent};
use crate::config::AnalyticsConfig;
use crate::services::geoip::GeoIpProvider;
use crate::storage::EventStore;
use crate::utils::ip::{extract_client_ip, is_public_ip};

/// referral 字段最大长度
const MAX_REFERRAL_LEN: usize = 2048;

/// 从请求中提取的访客信息
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub ip: Option<String>,
}

impl RequestMeta {
    pub fn from_request(req: &HttpRequest) -> Self {
        let header_str = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|h| h.to_str().ok())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        Self {
            user_agent: header_str(header::USER_AGENT),
            referer: header_str(header::REFERER),
            ip: extract_client_ip(req),
        }
    }
}

/// 事件记录器
#[derive(Clone)]
pub struct EventRecorder {
    store: Arc<dyn EventStore>,
    geoip: Option<GeoIpProvider>,
    enabled: bool,
}

impl EventRecorder {
    pub fn new(store: Arc<dyn EventStore>, geoip: Option<GeoIpProvider>, enabled: bool) -> Self {
        Self {
            store,
            geoip,
            enabled,
        }
    }

    /// 按 `[analytics]` 配置创建，未开启 geo 查询时不初始化 GeoIP
    pub fn from_config(store: Arc<dyn EventStore>, config: &AnalyticsConfig) -> Self {
        let geoip = config
            .enable_geo_lookup
            .then(|| GeoIpProvider::new(config));
        Self::new(store, geoip, config.enable_recording)
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 组装待写入的事件（设备识别、地理位置、来源）
    pub async fn build_event(
        &self,
        invite_id: &str,
        event_type: EventType,
        meta: &RequestMeta,
    ) -> NewAnalyticsEvent {
        let location = match (&self.geoip, meta.ip.as_deref()) {
            (Some(geoip), Some(ip)) if is_public_ip(ip) => geoip.location_for(ip).await,
            _ => String::new(),
        };

        let referral: String = meta
            .referer
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(MAX_REFERRAL_LEN)
            .collect();

        NewAnalyticsEvent::new(invite_id, event_type)
            .at(Utc::now())
            .with_device(classify_device(meta.user_agent.as_deref()))
            .with_location(location)
            .with_referral(referral)
    }

    /// 后台记录一条事件，记录关闭时返回 None
    pub fn record(
        &self,
        invite_id: &str,
        event_type: EventType,
        meta: RequestMeta,
    ) -> Option<JoinHandle<()>> {
        if !self.enabled {
            return None;
        }

        let recorder = self.clone();
        let invite_id = invite_id.to_string();

        Some(tokio::spawn(async move {
            let event = recorder.build_event(&invite_id, event_type, &meta).await;
            match recorder.store.append_event(event).await {
                Ok(stored) => debug!("Recorded {} for invitation {}", stored.event_type, invite_id),
                Err(e) => warn!(
                    "Failed to record {} event for invitation {}: {}",
                    event_type, invite_id, e
                ),
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{AnalyticsEvent, DeviceClass};
    use crate::errors::{BiolinkError, Result};
    use crate::services::geoip::{GeoInfo, GeoIpLookup};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryStore {
        events: Mutex<Vec<NewAnalyticsEvent>>,
        fail: bool,
    }

    #[async_trait]
    impl EventStore for MemoryStore {
        async fn fetch_events(&self, _invite_ids: &[String]) -> Result<Vec<AnalyticsEvent>> {
            Ok(Vec::new())
        }

        async fn append_event(&self, event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
            if self.fail {
                return Err(BiolinkError::database_operation("disk full"));
            }
            self.events.lock().unwrap().push(event.clone());
            Ok(AnalyticsEvent {
                id: "1".into(),
                invite_id: event.invite_id,
                timestamp: event.timestamp,
                event_type: event.event_type,
                location: event.location,
                device: event.device,
                referral: event.referral,
            })
        }
    }

    struct FixedGeo;

    #[async_trait]
    impl GeoIpLookup for FixedGeo {
        async fn lookup(&self, _ip: &str) -> Option<GeoInfo> {
            Some(GeoInfo {
                country: Some("DE".into()),
                city: Some("Berlin".into()),
            })
        }

        fn name(&self) -> &'static str {
            "Fixed"
        }
    }

    fn meta(ip: &str) -> RequestMeta {
        RequestMeta {
            user_agent: Some("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0) Mobile Safari".into()),
            referer: Some("https://instagram.com/".into()),
            ip: Some(ip.into()),
        }
    }

    #[tokio::test]
    async fn test_record_appends_classified_event() {
        let store = Arc::new(MemoryStore::default());
        let geo = GeoIpProvider::from_lookup(Arc::new(FixedGeo));
        let recorder = EventRecorder::new(store.clone(), Some(geo), true);

        recorder
            .record("inv1", EventType::Click, meta("203.0.113.9"))
            .unwrap()
            .await
            .unwrap();

        let events = store.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].invite_id, "inv1");
        assert_eq!(events[0].event_type, EventType::Click);
        assert_eq!(events[0].device, DeviceClass::Mobile);
        assert_eq!(events[0].location, "Berlin, DE");
        assert_eq!(events[0].referral, "https://instagram.com/");
    }

    #[tokio::test]
    async fn test_private_ip_skips_geo_lookup() {
        let store = Arc::new(MemoryStore::default());
        let geo = GeoIpProvider::from_lookup(Arc::new(FixedGeo));
        let recorder = EventRecorder::new(store, Some(geo), true);

        let event = recorder
            .build_event("inv1", EventType::View, &meta("192.168.0.10"))
            .await;
        assert_eq!(event.location, "");
    }

    #[tokio::test]
    async fn test_store_failure_is_swallowed() {
        let store = Arc::new(MemoryStore {
            fail: true,
            ..Default::default()
        });
        let recorder = EventRecorder::new(store.clone(), None, true);

        let handle = recorder
            .record("inv1", EventType::View, RequestMeta::default())
            .unwrap();
        assert!(handle.await.is_ok());
        assert!(store.events.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_recorder_does_nothing() {
        let store = Arc::new(MemoryStore::default());
        let recorder = EventRecorder::new(store.clone(), None, false);
        assert!(
            recorder
                .record("inv1", EventType::View, RequestMeta::default())
                .is_none()
        );
        assert!(store.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_request_meta_from_request() {
        let req = actix_web::test::TestRequest::default()
            .insert_header((header::USER_AGENT, "curl/8.0"))
            .insert_header((header::REFERER, "  "))
            .peer_addr("198.51.100.4:443".parse().unwrap())
            .to_http_request();
        let meta = RequestMeta::from_request(&req);
        assert_eq!(meta.user_agent.as_deref(), Some("curl/8.0"));
        assert_eq!(meta.referer, None);
        assert_eq!(meta.ip.as_deref(), Some("198.51.100.4"));
    }
}
