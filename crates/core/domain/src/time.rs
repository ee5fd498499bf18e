//! 固定时区辅助函数。

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use chrono_tz::Tz;

/// 默认写入/展示时区。
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::UTC;

/// 解析 IANA 时区名（如 `Asia/Kolkata`）。
pub fn parse_timezone(name: &str) -> Option<Tz> {
    name.trim().parse::<Tz>().ok()
}

/// 当前时间（目标时区，带显式偏移）。
pub fn now_in(tz: &Tz) -> DateTime<FixedOffset> {
    Utc::now().with_timezone(tz).fixed_offset()
}

/// 转换到展示时区，不改变时刻本身。
pub fn to_timezone<T: TimeZone>(timestamp: &DateTime<T>, tz: &Tz) -> DateTime<FixedOffset> {
    timestamp.with_timezone(tz).fixed_offset()
}
