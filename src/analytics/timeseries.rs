//! 按日聚合统计事件
//!
//! 窗口按参考时间所在时区的自然日计算（不是 24h 的整数倍），
//! 事件时间戳先换算到同一时区再取日期。

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::{AnalyticsEvent, EventType};

/// 默认图表窗口天数
pub const WINDOW_DAYS: u32 = 7;

/// 某一天的浏览 / 点击数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyBucket {
    /// YYYY-MM-DD
    pub date: String,
    pub views: u64,
    pub clicks: u64,
}

impl DailyBucket {
    fn empty(day: NaiveDate) -> Self {
        Self {
            date: day.format("%Y-%m-%d").to_string(),
            views: 0,
            clicks: 0,
        }
    }

    fn add(&mut self, event_type: EventType) {
        match event_type {
            EventType::View => self.views += 1,
            EventType::Click => self.clicks += 1,
        }
    }
}

/// 一组事件的总浏览 / 点击数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTotals {
    pub views: u64,
    pub clicks: u64,
}

impl EventTotals {
    pub fn from_events<'a, I>(events: I) -> Self
    where
        I: IntoIterator<Item = &'a AnalyticsEvent>,
    {
        events
            .into_iter()
            .fold(Self::default(), |mut acc, event| {
                match event.event_type {
                    EventType::View => acc.views += 1,
                    EventType::Click => acc.clicks += 1,
                }
                acc
            })
    }
}

/// 以 `reference` 所在日为最后一天，生成 `days` 个按日升序排列的桶
///
/// 调用方负责按 invite_id 预先过滤事件；窗口外的事件直接丢弃。
pub fn bucket_by_day<'a, Tz, I>(reference: &DateTime<Tz>, days: u32, events: I) -> Vec<DailyBucket>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a AnalyticsEvent>,
{
    let tz = reference.timezone();
    let today = reference.date_naive();

    let window: Vec<NaiveDate> = (0..days)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
        .collect();

    let index: HashMap<NaiveDate, usize> = window
        .iter()
        .enumerate()
        .map(|(i, day)| (*day, i))
        .collect();

    let mut buckets: Vec<DailyBucket> = window.into_iter().map(DailyBucket::empty).collect();

    for event in events {
        let day = event.timestamp.with_timezone(&tz).date_naive();
        if let Some(&i) = index.get(&day) {
            buckets[i].add(event.event_type);
        }
    }

    buckets
}

/// 最近 7 天（含当天）的按日统计
pub fn last_seven_days<'a, Tz, I>(reference: &DateTime<Tz>, events: I) -> Vec<DailyBucket>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a AnalyticsEvent>,
{
    bucket_by_day(reference, WINDOW_DAYS, events)
}
