//! 状态事件与历史序列。

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 可达性结果（探测结果与历史事件共用）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reachability {
    Online,
    Offline,
}

impl Reachability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reachability::Online => "Online",
            Reachability::Offline => "Offline",
        }
    }

    /// 解析持久化的状态字符串（大小写不敏感）。
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "online" => Some(Reachability::Online),
            "offline" => Some(Reachability::Offline),
            _ => None,
        }
    }
}

impl fmt::Display for Reachability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 单条状态事件，写入后不可变。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub status: Reachability,
    pub timestamp: DateTime<FixedOffset>,
}

impl StatusEvent {
    pub fn new(status: Reachability, timestamp: DateTime<FixedOffset>) -> Self {
        Self { status, timestamp }
    }
}

/// 标识 -> 按时间顺序排列的事件序列。
///
/// 使用 BTreeMap 保证持久化输出按键排序，便于 diff。
pub type HistoryMap = BTreeMap<String, Vec<StatusEvent>>;
