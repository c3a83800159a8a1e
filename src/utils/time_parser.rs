//! 邀请页过期时间解析
//!
//! 支持：
//! - RFC3339：2024-06-10T12:00:00Z
//! - 相对时间：30m, 12h, 7d, 2w, 1M, 1y
//! - 组合：1d12h

use chrono::{DateTime, Duration, Utc};

use crate::errors::{BiolinkError, Result};

/// 解析过期时间，相对时间以 `now` 为起点
pub fn parse_expiry(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let input = input.trim();
    if input.is_empty() {
        return Err(BiolinkError::date_parse("Expiry cannot be empty"));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let duration = parse_relative(input)?;
    now.checked_add_signed(duration)
        .ok_or_else(|| BiolinkError::date_parse(format!("Expiry out of range: '{}'", input)))
}

fn unit_duration(unit: &str, num: i64) -> Option<Duration> {
    // "M" 是月，"m" 是分钟，区分大小写
    if unit == "M" {
        return Duration::try_days(num.checked_mul(30)?);
    }
    match unit.to_lowercase().as_str() {
        "s" | "sec" | "second" | "seconds" => Duration::try_seconds(num),
        "m" | "min" | "minute" | "minutes" => Duration::try_minutes(num),
        "h" | "hour" | "hours" => Duration::try_hours(num),
        "d" | "day" | "days" => Duration::try_days(num),
        "w" | "week" | "weeks" => Duration::try_weeks(num),
        "month" | "months" => Duration::try_days(num.checked_mul(30)?),
        "y" | "year" | "years" => Duration::try_days(num.checked_mul(365)?),
        _ => None,
    }
}

fn parse_relative(input: &str) -> Result<Duration> {
    let invalid = || BiolinkError::date_parse(format!("Invalid expiry format: '{}'", input));

    let mut total = Duration::zero();
    let mut remaining = input;

    while !remaining.is_empty() {
        let digits = remaining
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(remaining.len());
        if digits == 0 {
            return Err(invalid());
        }
        let num: i64 = remaining[..digits].parse().map_err(|_| invalid())?;
        remaining = &remaining[digits..];

        let unit_len = remaining
            .find(|c: char| !c.is_alphabetic())
            .unwrap_or(remaining.len());
        if unit_len == 0 {
            return Err(BiolinkError::date_parse(format!(
                "Missing time unit after '{}'",
                num
            )));
        }
        let unit = &remaining[..unit_len];
        remaining = &remaining[unit_len..];

        let duration = unit_duration(unit, num).ok_or_else(|| {
            BiolinkError::date_parse(format!("Unsupported time unit: '{}'", unit))
        })?;
        total = total.checked_add(&duration).ok_or_else(invalid)?;
    }

    if total <= Duration::zero() {
        return Err(BiolinkError::date_parse("Expiry interval must be positive"));
    }
    Ok(total)
}
