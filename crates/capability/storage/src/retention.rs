//! 合并、去重与保留期裁剪。
//!
//! 两个后端共用同一套合并逻辑，保证写入后的不变式一致：
//! - 同一标识的相邻事件状态不相同
//! - 所有事件的时间戳都不早于 `now - window`

use chrono::{DateTime, Duration, Utc};
use domain::{HistoryMap, StatusEvent};

/// 默认保留天数。
pub const DEFAULT_RETENTION_DAYS: u64 = 30;

/// 保留期策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetentionPolicy {
    window: Duration,
}

impl RetentionPolicy {
    pub fn new(window: Duration) -> Self {
        Self { window }
    }

    pub fn days(days: u64) -> Self {
        let window = i64::try_from(days)
            .ok()
            .and_then(Duration::try_days)
            .unwrap_or(Duration::MAX);
        Self::new(window)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// 早于该时刻的事件会被裁剪。
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.window)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::days(DEFAULT_RETENTION_DAYS)
    }
}

/// 单次合并的统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub appended: usize,
    pub duplicates: usize,
    pub collapsed: usize,
    pub pruned: usize,
}

/// 合并持久化历史与新事件，并对全部序列执行裁剪与相邻去重。
///
/// 与已存事件完全相同（状态和时刻都相同）的新事件会被忽略，
/// 因此同一批次重复合并的结果不变。
pub fn merge_histories(
    mut persisted: HistoryMap,
    incoming: HistoryMap,
    cutoff: DateTime<Utc>,
) -> (HistoryMap, MergeReport) {
    let mut report = MergeReport::default();

    for (identifier, events) in incoming {
        let identifier = identifier.trim().to_string();
        if identifier.is_empty() {
            continue;
        }
        let sequence = persisted.entry(identifier).or_default();
        for event in events {
            if sequence.iter().any(|existing| existing == &event) {
                report.duplicates += 1;
                continue;
            }
            sequence.push(event);
            report.appended += 1;
        }
    }

    persisted.retain(|_, sequence| {
        let before = sequence.len();
        sequence.retain(|event| event.timestamp >= cutoff);
        report.pruned += before - sequence.len();
        report.collapsed += collapse_repeats(sequence);
        !sequence.is_empty()
    });

    (persisted, report)
}

/// 去掉与前一条状态相同的事件，保留最早的那条（即迁移发生的时刻）。
fn collapse_repeats(sequence: &mut Vec<StatusEvent>) -> usize {
    let before = sequence.len();
    sequence.dedup_by(|current, previous| current.status == previous.status);
    before - sequence.len()
}
