//! 派生统计结构（不持久化）。

use chrono::Duration;
use std::collections::BTreeMap;

/// 单个分组的在线统计。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupSummary {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

/// 全局与分组统计。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    pub total_devices: usize,
    pub total_online: usize,
    pub total_offline: usize,
    pub groups: BTreeMap<String, GroupSummary>,
}

/// 历史回放结果。
///
/// - `uptime`：在线区间累计
/// - `downtime`：回放结束时仍未闭合的离线累计
/// - `total_downtime_duration`：已闭合（Offline -> Online）的离线累计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub uptime: Duration,
    pub downtime: Duration,
    pub total_downtime_duration: Duration,
}

impl Default for ReplayStats {
    fn default() -> Self {
        Self {
            uptime: Duration::zero(),
            downtime: Duration::zero(),
            total_downtime_duration: Duration::zero(),
        }
    }
}

/// 以整天/小时/分钟输出时长，向下取整，负值按 0 处理。
pub fn format_duration(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let days = minutes / (24 * 60);
    let hours = (minutes % (24 * 60)) / 60;
    let minutes = minutes % 60;
    format!("{days}d {hours}h {minutes}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_duration_truncates() {
        let duration = Duration::days(1) + Duration::hours(2) + Duration::seconds(3 * 60 + 59);
        assert_eq!(format_duration(duration), "1d 2h 3m");
    }

    #[test]
    fn format_duration_clamps_negative() {
        assert_eq!(format_duration(Duration::minutes(-5)), "0d 0h 0m");
    }
}
