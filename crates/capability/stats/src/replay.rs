//! 历史回放：按时间顺序累计在线与离线时长。

use chrono::Duration;
use domain::{Reachability, ReplayStats, StatusEvent};

/// 单次正向回放历史序列。
///
/// - 相邻事件的间隔计入前一事件的状态（在线计入 uptime，否则计入 downtime）
/// - 观察到 Offline -> Online 时，把累计的 downtime 并入 total 并清零
/// - 间隔按整分钟截断；<= 0（不足一分钟、乱序或重复时间戳）不计入任何一项，但仍推进游标
///
/// 序列末尾仍处于离线的区间保留在 `downtime`，不并入 total。
pub fn compute_stats(history: &[StatusEvent]) -> ReplayStats {
    let mut stats = ReplayStats::default();
    let Some((first, rest)) = history.split_first() else {
        return stats;
    };

    let mut last_status = first.status;
    let mut last_timestamp = first.timestamp;
    for event in rest {
        let delta = event
            .timestamp
            .signed_duration_since(last_timestamp)
            .num_minutes();
        if delta > 0 {
            let delta = Duration::minutes(delta);
            match last_status {
                Reachability::Online => stats.uptime += delta,
                Reachability::Offline => stats.downtime += delta,
            }
        }
        if last_status == Reachability::Offline && event.status == Reachability::Online {
            stats.total_downtime_duration += stats.downtime;
            stats.downtime = Duration::zero();
        }
        last_status = event.status;
        last_timestamp = event.timestamp;
    }
    stats
}
