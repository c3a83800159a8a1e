//! 原始事件 CSV 导出

use std::fmt::Write as _;

use chrono::TimeZone;
use csv::WriterBuilder;
use serde::Serialize;

use super::AnalyticsEvent;
use crate::errors::{BiolinkError, Result};

/// en-US `toLocaleString` 风格，例如 `6/8/2024, 3:05:09 PM`
pub const DEFAULT_TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// 导出行（仅用于序列化）
#[derive(Debug, Serialize)]
struct EventCsvRow<'a> {
    #[serde(rename = "Time")]
    time: String,
    #[serde(rename = "Type")]
    event_type: &'a str,
    #[serde(rename = "Location")]
    location: &'a str,
    #[serde(rename = "Device")]
    device: &'a str,
    #[serde(rename = "Referral")]
    referral: &'a str,
}

/// 将事件按给定顺序导出为 CSV，时间按 `tz` 和 `time_format` 渲染
pub fn export_events_csv<Tz>(
    events: &[AnalyticsEvent],
    tz: &Tz,
    time_format: &str,
) -> Result<Vec<u8>>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    // 无事件时也要输出表头
    csv_writer.write_record(["Time", "Type", "Location", "Device", "Referral"])?;

    for event in events {
        let mut time = String::new();
        write!(
            time,
            "{}",
            event.timestamp.with_timezone(tz).format(time_format)
        )
        .map_err(|_| {
            BiolinkError::validation(format!("Invalid export time format: {}", time_format))
        })?;

        let row = EventCsvRow {
            time,
            event_type: event.event_type.as_ref(),
            location: &event.location,
            device: event.device.as_ref(),
            referral: &event.referral,
        };
        csv_writer.serialize(&row).map_err(|e| {
            BiolinkError::serialization(format!("Failed to write CSV row: {}", e))
        })?;
    }

    csv_writer
        .into_inner()
        .map_err(|e| BiolinkError::serialization(format!("Failed to flush CSV: {}", e)))
}

/// `{title}-analytics.csv`，非 ASCII 及不适合放进响应头的字符替换为 `_`
pub fn export_filename(title: &str) -> String {
    let safe: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, ' ' | '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let safe = safe.trim();
    if safe.is_empty() {
        "invitation-analytics.csv".to_string()
    } else {
        format!("{}-analytics.csv", safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{DeviceClass, EventType};
    use chrono::{DateTime, FixedOffset, Utc};

    fn event(ts: &str, event_type: EventType, location: &str, referral: &str) -> AnalyticsEvent {
        AnalyticsEvent {
            id: "id".into(),
            invite_id: "invite".into(),
            timestamp: DateTime::parse_from_rfc3339(ts).unwrap().with_timezone(&Utc),
            event_type,
            location: location.into(),
            device: DeviceClass::Mobile,
            referral: referral.into(),
        }
    }

    #[test]
    fn test_header_and_rows() {
        let events = vec![
            event("2024-06-08T15:05:09Z", EventType::View, "Berlin, DE", ""),
            event(
                "2024-06-09T09:00:00Z",
                EventType::Click,
                "",
                "https://t.co/x",
            ),
        ];
        let bytes = export_events_csv(&events, &Utc, DEFAULT_TIME_FORMAT).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Time,Type,Location,Device,Referral");
        assert_eq!(lines[1], "\"6/8/2024, 3:05:09 PM\",view,\"Berlin, DE\",mobile,");
        assert_eq!(lines[2], "\"6/9/2024, 9:00:00 AM\",click,,mobile,https://t.co/x");
    }

    #[test]
    fn test_empty_export_has_header_only() {
        let bytes = export_events_csv(&[], &Utc, DEFAULT_TIME_FORMAT).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "Time,Type,Location,Device,Referral\n"
        );
    }

    #[test]
    fn test_time_rendered_in_given_timezone() {
        let tz = FixedOffset::west_opt(4 * 3600).unwrap();
        let events = vec![event("2024-06-08T02:00:00Z", EventType::View, "", "")];
        let bytes = export_events_csv(&events, &tz, "%Y-%m-%d %H:%M").unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("2024-06-07 22:00,view"));
    }

    #[test]
    fn test_invalid_time_format_is_rejected() {
        let events = vec![event("2024-06-08T02:00:00Z", EventType::View, "", "")];
        let result = export_events_csv(&events, &Utc, "%Q%");
        assert!(matches!(result, Err(BiolinkError::Validation(_))));
    }

    #[test]
    fn test_export_filename() {
        assert_eq!(export_filename("Summer Party"), "Summer Party-analytics.csv");
        assert_eq!(export_filename("a/b\"c"), "a_b_c-analytics.csv");
        assert_eq!(export_filename("   "), "invitation-analytics.csv");
        assert_eq!(export_filename("Fête 2024"), "F_te 2024-analytics.csv");
        assert!(export_filename("生日派对").is_ascii());
    }
}
