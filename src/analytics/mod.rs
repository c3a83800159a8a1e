//! 邀请页访问统计
//!
//! - `timeseries`: 最近 7 天按日聚合
//! - `classifier`: User-Agent 设备 / 浏览器识别
//! - `export`: 原始事件 CSV 导出
//! - `recorder`: 后台记录 view / click 事件

pub mod classifier;
pub mod export;
pub mod recorder;
pub mod timeseries;

pub use classifier::{ClientInfo, browser_os_label, classify_device};
pub use export::{export_events_csv, export_filename};
pub use recorder::{EventRecorder, RequestMeta};
pub use timeseries::{DailyBucket, EventTotals, bucket_by_day, last_seven_days};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// 事件类型
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EventType {
    /// 访客打开邀请页
    View,
    /// 访客点击邀请页中的链接
    Click,
}

/// 粗粒度设备类别
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    AsRefStr,
    Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

/// 已存储的统计事件（创建后不再修改）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    pub id: String,
    pub invite_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// "City, CC" / "CC" / 空
    pub location: String,
    pub device: DeviceClass,
    /// Referer header，可能为空
    pub referral: String,
}

/// 待写入的统计事件，id 由存储层生成
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub invite_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: EventType,
    pub location: String,
    pub device: DeviceClass,
    pub referral: String,
}

impl NewAnalyticsEvent {
    /// 创建一条以当前时间为时间戳的事件
    pub fn new(invite_id: impl Into<String>, event_type: EventType) -> Self {
        Self {
            invite_id: invite_id.into(),
            timestamp: Utc::now(),
            event_type,
            location: String::new(),
            device: DeviceClass::Desktop,
            referral: String::new(),
        }
    }

    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_device(mut self, device: DeviceClass) -> Self {
        self.device = device;
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_referral(mut self, referral: impl Into<String>) -> Self {
        self.referral = referral.into();
        self
    }
}
