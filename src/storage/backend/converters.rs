//! Sea-ORM Model 与领域类型互转
//!
//! links / theme / catalogue 以 JSON 文本列存储。

use sea_orm::ActiveValue::Set;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::analytics::{AnalyticsEvent, DeviceClass, EventType, NewAnalyticsEvent};
use crate::errors::{BiolinkError, Result};
use crate::storage::{Invitation, Profile};

use migration::entities::{invitation, invitation_analytics, profile};

fn decode_json<T: DeserializeOwned>(column: &str, raw: &str) -> Result<T> {
    serde_json::from_str(raw).map_err(|e| {
        BiolinkError::serialization(format!("Column '{}' holds invalid JSON: {}", column, e))
    })
}

fn encode_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

pub fn model_to_profile(model: profile::Model) -> Result<Profile> {
    Ok(Profile {
        links: decode_json("profiles.links", &model.links)?,
        id: model.id,
        name: model.name,
        username: model.username,
        bio: model.bio,
        avatar: model.avatar,
        email: model.email,
        phone: model.phone,
        country_code: model.country_code,
        premium: model.premium,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// premium 字段不写入，由外部开通流程维护
pub fn profile_to_active_model(p: &Profile) -> Result<profile::ActiveModel> {
    Ok(profile::ActiveModel {
        id: Set(p.id.clone()),
        name: Set(p.name.clone()),
        username: Set(p.username.clone()),
        email: Set(p.email.clone()),
        phone: Set(p.phone.clone()),
        country_code: Set(p.country_code.clone()),
        bio: Set(p.bio.clone()),
        avatar: Set(p.avatar.clone()),
        links: Set(encode_json(&p.links)?),
        created_at: Set(p.created_at),
        updated_at: Set(p.updated_at),
        ..Default::default()
    })
}

pub fn model_to_invitation(model: invitation::Model) -> Result<Invitation> {
    let theme = match model.theme.as_deref() {
        Some(raw) if !raw.is_empty() => Some(decode_json("invitations.theme", raw)?),
        _ => None,
    };

    Ok(Invitation {
        links: decode_json("invitations.links", &model.links)?,
        catalogue: decode_json("invitations.catalogue", &model.catalogue)?,
        theme,
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        description: model.description,
        is_active: model.is_active,
        created_at: model.created_at,
        expires_at: model.expires_at,
    })
}

pub fn invitation_to_active_model(inv: &Invitation) -> Result<invitation::ActiveModel> {
    Ok(invitation::ActiveModel {
        id: Set(inv.id.clone()),
        user_id: Set(inv.user_id.clone()),
        title: Set(inv.title.clone()),
        description: Set(inv.description.clone()),
        links: Set(encode_json(&inv.links)?),
        theme: Set(inv.theme.as_ref().map(encode_json).transpose()?),
        catalogue: Set(encode_json(&inv.catalogue)?),
        is_active: Set(inv.is_active),
        created_at: Set(inv.created_at),
        expires_at: Set(inv.expires_at),
    })
}

/// 类型列无法识别时返回 None（由调用方跳过该行）
pub fn model_to_event(model: invitation_analytics::Model) -> Option<AnalyticsEvent> {
    let event_type: EventType = model.event_type.parse().ok()?;
    let device = model.device.parse().unwrap_or(DeviceClass::Desktop);

    Some(AnalyticsEvent {
        id: model.id,
        invite_id: model.invite_id,
        timestamp: model.timestamp,
        event_type,
        location: model.location,
        device,
        referral: model.referral,
    })
}

pub fn new_event_to_active_model(
    id: &str,
    event: &NewAnalyticsEvent,
) -> invitation_analytics::ActiveModel {
    invitation_analytics::ActiveModel {
        id: Set(id.to_string()),
        invite_id: Set(event.invite_id.clone()),
        timestamp: Set(event.timestamp),
        event_type: Set(event.event_type.as_ref().to_string()),
        location: Set(event.location.clone()),
        device: Set(event.device.as_ref().to_string()),
        referral: Set(event.referral.clone()),
    }
}
