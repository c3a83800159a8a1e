//! Storage backend tests
//!
//! Tests for SeaOrmStorage using temporary SQLite databases.

use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

use biolink::analytics::{DeviceClass, EventType, NewAnalyticsEvent};
use biolink::storage::backend::{SeaOrmStorage, connect_sqlite, infer_backend_from_url, run_migrations};
use biolink::storage::{EventStore, InviteLink, Invitation, Profile, ProfileLink};

/// 创建临时 SQLite 数据库的存储实例
async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let db = connect_sqlite(&db_url).await.expect("Failed to connect");
    run_migrations(&db).await.expect("Failed to migrate");

    (
        Arc::new(SeaOrmStorage::from_connection(db, "sqlite")),
        temp_dir,
    )
}

fn invitation(id: &str, user_id: &str, created_offset_mins: i64) -> Invitation {
    Invitation {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: format!("Invite {}", id),
        description: String::new(),
        links: vec![InviteLink {
            id: "rsvp".into(),
            title: "RSVP".into(),
            url: "https://forms.example/rsvp".into(),
            icon: String::new(),
            description: None,
        }],
        theme: None,
        catalogue: vec![],
        is_active: true,
        created_at: Utc::now() + Duration::minutes(created_offset_mins),
        expires_at: None,
    }
}

// =============================================================================
// URL 推断
// =============================================================================

#[test]
fn test_infer_backend_from_url() {
    assert_eq!(infer_backend_from_url("sqlite://biolink.db").unwrap(), "sqlite");
    assert_eq!(infer_backend_from_url("data.db").unwrap(), "sqlite");
    assert_eq!(
        infer_backend_from_url("postgres://u:p@localhost/bio").unwrap(),
        "postgres"
    );
    assert_eq!(
        infer_backend_from_url("mariadb://u:p@localhost/bio").unwrap(),
        "mysql"
    );
    assert!(infer_backend_from_url("redis://localhost").is_err());
}

// =============================================================================
// 资料
// =============================================================================

#[tokio::test]
async fn test_ensure_profile_is_idempotent() {
    let (storage, _dir) = create_temp_storage().await;
    let now = Utc::now();

    storage
        .ensure_profile("u1", Some("a@example.com".into()), now)
        .await
        .unwrap();
    storage.ensure_profile("u1", None, now).await.unwrap();

    let profile = storage.get_profile("u1").await.unwrap().unwrap();
    assert_eq!(profile.email.as_deref(), Some("a@example.com"));
    assert!(!profile.premium);
}

#[tokio::test]
async fn test_upsert_profile_keeps_premium() {
    let (storage, _dir) = create_temp_storage().await;
    let now = Utc::now();

    storage.ensure_profile("u1", None, now).await.unwrap();
    storage.set_premium("u1", true).await.unwrap();

    let mut profile = Profile::empty("u1", None, now);
    profile.name = "Jane".into();
    profile.username = Some("jane".into());
    profile.links = vec![ProfileLink {
        id: "l1".into(),
        title: "Blog".into(),
        url: "https://blog.example".into(),
        icon: String::new(),
    }];

    let saved = storage.upsert_profile(&profile).await.unwrap();
    assert_eq!(saved.name, "Jane");
    assert_eq!(saved.links.len(), 1);
    assert!(saved.premium);
}

#[tokio::test]
async fn test_username_taken_excludes_self() {
    let (storage, _dir) = create_temp_storage().await;
    let now = Utc::now();

    let mut profile = Profile::empty("u1", None, now);
    profile.username = Some("jane".into());
    storage.upsert_profile(&profile).await.unwrap();

    assert!(storage.username_taken("jane", "u2").await.unwrap());
    assert!(!storage.username_taken("jane", "u1").await.unwrap());
    assert!(!storage.username_taken("john", "u2").await.unwrap());
}

#[tokio::test]
async fn test_get_profile_by_username() {
    let (storage, _dir) = create_temp_storage().await;

    let mut profile = Profile::empty("u1", None, Utc::now());
    profile.username = Some("jane".into());
    profile.bio = "hello".into();
    storage.upsert_profile(&profile).await.unwrap();

    let found = storage.get_profile_by_username("jane").await.unwrap().unwrap();
    assert_eq!(found.id, "u1");
    assert_eq!(found.bio, "hello");
    assert!(storage.get_profile_by_username("john").await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_premium_unknown_user() {
    let (storage, _dir) = create_temp_storage().await;
    assert!(storage.set_premium("ghost", true).await.is_err());
}

// =============================================================================
// 邀请页
// =============================================================================

#[tokio::test]
async fn test_list_invitations_newest_first_and_scoped() {
    let (storage, _dir) = create_temp_storage().await;

    storage.insert_invitation(&invitation("a", "u1", -10)).await.unwrap();
    storage.insert_invitation(&invitation("b", "u1", 0)).await.unwrap();
    storage.insert_invitation(&invitation("c", "u2", 5)).await.unwrap();

    let ids: Vec<String> = storage
        .list_invitations("u1")
        .await
        .unwrap()
        .into_iter()
        .map(|inv| inv.id)
        .collect();
    assert_eq!(ids, vec!["b", "a"]);
}

#[tokio::test]
async fn test_invitation_json_columns_round_trip() {
    let (storage, _dir) = create_temp_storage().await;
    let inv = invitation("a", "u1", 0);
    storage.insert_invitation(&inv).await.unwrap();

    let loaded = storage.get_invitation("a").await.unwrap().unwrap();
    assert_eq!(loaded.links, inv.links);
    assert!(loaded.theme.is_none());
    assert!(storage.get_invitation("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_set_invitation_active_only_own() {
    let (storage, _dir) = create_temp_storage().await;
    storage.insert_invitation(&invitation("a", "u1", 0)).await.unwrap();

    storage.set_invitation_active("u2", "a", false).await.unwrap();
    assert!(storage.get_invitation("a").await.unwrap().unwrap().is_active);

    storage.set_invitation_active("u1", "a", false).await.unwrap();
    assert!(!storage.get_invitation("a").await.unwrap().unwrap().is_active);

    storage.set_invitation_active("u1", "a", true).await.unwrap();
    assert!(storage.get_invitation("a").await.unwrap().unwrap().is_active);
}

#[tokio::test]
async fn test_delete_invitation_only_own_and_removes_events() {
    let (storage, _dir) = create_temp_storage().await;
    storage.insert_invitation(&invitation("a", "u1", 0)).await.unwrap();
    storage
        .append_event(NewAnalyticsEvent::new("a", EventType::View))
        .await
        .unwrap();

    assert!(!storage.delete_invitation("u2", "a").await.unwrap());
    assert!(storage.get_invitation("a").await.unwrap().is_some());

    assert!(storage.delete_invitation("u1", "a").await.unwrap());
    assert!(storage.get_invitation("a").await.unwrap().is_none());
    assert!(storage.fetch_events(&["a".to_string()]).await.unwrap().is_empty());
}

// =============================================================================
// 事件
// =============================================================================

#[tokio::test]
async fn test_append_and_fetch_events() {
    let (storage, _dir) = create_temp_storage().await;
    let t = |h| Utc.with_ymd_and_hms(2024, 6, 10, h, 0, 0).unwrap();

    storage
        .append_event(NewAnalyticsEvent::new("a", EventType::Click).at(t(12)))
        .await
        .unwrap();
    let stored = storage
        .append_event(
            NewAnalyticsEvent::new("a", EventType::View)
                .at(t(9))
                .with_device(DeviceClass::Tablet)
                .with_location("Berlin, DE")
                .with_referral("https://instagram.com/"),
        )
        .await
        .unwrap();
    storage
        .append_event(NewAnalyticsEvent::new("b", EventType::View).at(t(10)))
        .await
        .unwrap();
    assert!(!stored.id.is_empty());

    let events = storage.fetch_events(&["a".to_string()]).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].timestamp, t(9));
    assert_eq!(events[0].device, DeviceClass::Tablet);
    assert_eq!(events[0].location, "Berlin, DE");
    assert_eq!(events[1].event_type, EventType::Click);

    let both = storage
        .fetch_events(&["a".to_string(), "b".to_string()])
        .await
        .unwrap();
    assert_eq!(both.len(), 3);

    assert!(storage.fetch_events(&[]).await.unwrap().is_empty());
}
