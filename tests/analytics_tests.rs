//! Analytics integration tests
//!
//! Bucketing, classification and export through the public API, plus
//! AnalyticsService behavior when the event store fails.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use sea_orm::ConnectionTrait;
use tempfile::TempDir;

use biolink::analytics::{
    AnalyticsEvent, ClientInfo, DeviceClass, EventType, NewAnalyticsEvent, export_events_csv,
    last_seven_days,
};
use biolink::errors::{BiolinkError, Result};
use biolink::services::{AnalyticsService, InvitationService, NewInvitation};
use biolink::session::Session;
use biolink::storage::EventStore;
use biolink::storage::backend::{SeaOrmStorage, connect_sqlite, run_migrations};

fn event(ts: &str, event_type: EventType) -> AnalyticsEvent {
    AnalyticsEvent {
        id: ts.to_string(),
        invite_id: "inv".to_string(),
        timestamp: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
        event_type,
        location: String::new(),
        device: DeviceClass::Desktop,
        referral: String::new(),
    }
}

fn session(user_id: &str, premium: bool) -> Session {
    Session {
        user_id: user_id.to_string(),
        email: None,
        premium,
        expires_at: None,
    }
}

/// 总是失败的事件存储
struct BrokenStore;

#[async_trait]
impl EventStore for BrokenStore {
    async fn fetch_events(&self, _invite_ids: &[String]) -> Result<Vec<AnalyticsEvent>> {
        Err(BiolinkError::database_connection("connection refused"))
    }

    async fn append_event(&self, _event: NewAnalyticsEvent) -> Result<AnalyticsEvent> {
        Err(BiolinkError::database_connection("connection refused"))
    }
}

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("analytics.db").display()
    );
    let db = connect_sqlite(&db_url).await.expect("Failed to connect");
    run_migrations(&db).await.expect("Failed to migrate");
    (
        Arc::new(SeaOrmStorage::from_connection(db, "sqlite")),
        temp_dir,
    )
}

#[test]
fn test_week_scenario_end_to_end() {
    let now = Utc.with_ymd_and_hms(2024, 6, 10, 15, 0, 0).unwrap();
    let events = vec![
        event("2024-06-10T09:00:00Z", EventType::View),
        event("2024-06-10T10:00:00Z", EventType::Click),
        event("2024-06-08T12:00:00Z", EventType::View),
        event("2024-06-01T12:00:00Z", EventType::View),
    ];

    let buckets = last_seven_days(&now, &events);
    let dates: Vec<&str> = buckets.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-06-04",
            "2024-06-05",
            "2024-06-06",
            "2024-06-07",
            "2024-06-08",
            "2024-06-09",
            "2024-06-10"
        ]
    );
    assert_eq!((buckets[6].views, buckets[6].clicks), (1, 1));
    assert_eq!((buckets[4].views, buckets[4].clicks), (1, 0));
    assert_eq!(buckets.iter().map(|b| b.views).sum::<u64>(), 2);
}

#[test]
fn test_reference_timezone_moves_day_boundary() {
    // 23:30 UTC 在 UTC+2 已是次日
    let tz = FixedOffset::east_opt(2 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2024, 6, 11, 9, 0, 0).unwrap();
    let events = vec![event("2024-06-10T23:30:00Z", EventType::View)];

    let buckets = last_seven_days(&now, &events);
    assert_eq!(buckets[6].date, "2024-06-11");
    assert_eq!(buckets[6].views, 1);
}

#[test]
fn test_client_info_and_export_together() {
    let ua = "Mozilla/5.0 (Linux; Android 14) Chrome/120.0 Mobile";
    let info = ClientInfo::from_user_agent(Some(ua));
    assert_eq!(info.device, DeviceClass::Mobile);
    assert_eq!(info.label, "Chrome on Linux");

    let mut click = event("2024-06-10T10:00:00Z", EventType::Click);
    click.device = info.device;
    click.location = "Lagos, NG".into();

    let csv = export_events_csv(&[click], &Utc, "%Y-%m-%d %H:%M").unwrap();
    let text = String::from_utf8(csv).unwrap();
    assert_eq!(
        text,
        "Time,Type,Location,Device,Referral\n2024-06-10 10:00,click,\"Lagos, NG\",mobile,\n"
    );
}

#[tokio::test]
async fn test_dashboard_degrades_when_event_fetch_fails() {
    let (storage, _dir) = create_temp_storage().await;
    let invitations = InvitationService::new(storage.clone(), "https://bio.example");
    let owner = session("u1", false);
    invitations
        .create(
            &owner,
            NewInvitation {
                title: "Dinner".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let analytics = AnalyticsService::new(
        storage,
        Arc::new(BrokenStore),
        "https://bio.example",
        "%Y-%m-%d",
    );
    let rows = analytics.dashboard(&owner, &Utc::now()).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Dinner");
    assert_eq!((rows[0].views, rows[0].clicks), (0, 0));
    assert_eq!(rows[0].daily.len(), 7);
    assert!(rows[0].daily.iter().all(|d| d.views == 0 && d.clicks == 0));
}

#[tokio::test]
async fn test_dashboard_degrades_when_invitation_list_fails() {
    let (storage, _dir) = create_temp_storage().await;
    let invitations = InvitationService::new(storage.clone(), "https://bio.example");
    let owner = session("u1", false);
    invitations
        .create(
            &owner,
            NewInvitation {
                title: "Dinner".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    storage
        .get_db()
        .execute_unprepared("DROP TABLE invitations")
        .await
        .unwrap();
    assert!(storage.list_invitations("u1").await.is_err());

    let analytics = AnalyticsService::new(
        storage.clone(),
        storage,
        "https://bio.example",
        "%Y-%m-%d",
    );
    let rows = analytics.dashboard(&owner, &Utc::now()).await.unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_dashboard_without_invitations_is_empty() {
    let (storage, _dir) = create_temp_storage().await;
    let analytics = AnalyticsService::new(
        storage.clone(),
        storage,
        "https://bio.example",
        "%Y-%m-%d",
    );
    let rows = analytics
        .dashboard(&session("nobody", false), &Utc::now())
        .await
        .unwrap();
    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_detail_requires_premium_and_ownership() {
    let (storage, _dir) = create_temp_storage().await;
    let invitations = InvitationService::new(storage.clone(), "https://bio.example");
    let view = invitations
        .create(
            &session("u1", true),
            NewInvitation {
                title: "Gala".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let id = view.invitation.id;
    storage
        .append_event(NewAnalyticsEvent::new(&id, EventType::View))
        .await
        .unwrap();

    let analytics = AnalyticsService::new(
        storage.clone(),
        storage,
        "https://bio.example",
        "%Y-%m-%d",
    );
    let now = Utc::now();

    assert!(matches!(
        analytics.invite_detail(&session("u1", false), &id, &now).await,
        Err(BiolinkError::PremiumRequired(_))
    ));
    assert!(matches!(
        analytics.invite_detail(&session("u2", true), &id, &now).await,
        Err(BiolinkError::NotFound(_))
    ));

    let detail = analytics
        .invite_detail(&session("u1", true), &id, &now)
        .await
        .unwrap();
    assert_eq!(detail.events.len(), 1);
    assert_eq!(detail.totals.views, 1);
    assert_eq!(detail.daily[6].views, 1);

    let export = analytics
        .export_csv(&session("u1", true), &id, &Utc)
        .await
        .unwrap();
    assert_eq!(export.filename, "Gala-analytics.csv");
    assert_eq!(String::from_utf8(export.content).unwrap().lines().count(), 2);
}
