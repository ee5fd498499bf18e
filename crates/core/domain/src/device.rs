//! 设备记录与巡检状态。

use crate::history::{Reachability, StatusEvent};
use std::collections::BTreeMap;
use std::fmt;

/// 巡检后的设备状态。
///
/// `Unknown` 表示本轮尚未解析；`IdentifierMissing` 表示清单行缺少标识，
/// 不参与探测。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceStatus {
    #[default]
    Unknown,
    Online,
    Offline,
    IdentifierMissing,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceStatus::Unknown => "Unknown",
            DeviceStatus::Online => "Online",
            DeviceStatus::Offline => "Offline",
            DeviceStatus::IdentifierMissing => "IdentifierMissing",
        }
    }

    /// 可写入历史的状态（仅 Online / Offline）。
    pub fn reachability(&self) -> Option<Reachability> {
        match self {
            DeviceStatus::Online => Some(Reachability::Online),
            DeviceStatus::Offline => Some(Reachability::Offline),
            DeviceStatus::Unknown | DeviceStatus::IdentifierMissing => None,
        }
    }
}

impl From<Reachability> for DeviceStatus {
    fn from(value: Reachability) -> Self {
        match value {
            Reachability::Online => DeviceStatus::Online,
            Reachability::Offline => DeviceStatus::Offline,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 设备记录。
///
/// `identifier` 是探测目标，也是历史存储的键；`status` 与 `history`
/// 每次巡检/查询时重新填充，不是权威状态。
#[derive(Debug, Clone, Default)]
pub struct DeviceRecord {
    pub identifier: String,
    pub display_name: Option<String>,
    pub region: Option<String>,
    pub attributes: BTreeMap<String, String>,
    pub status: DeviceStatus,
    pub history: Vec<StatusEvent>,
}

impl DeviceRecord {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into().trim().to_string(),
            ..Self::default()
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_status(mut self, status: DeviceStatus) -> Self {
        self.status = status;
        self
    }

    pub fn has_identifier(&self) -> bool {
        !self.identifier.trim().is_empty()
    }

    pub fn is_online(&self) -> bool {
        self.status == DeviceStatus::Online
    }
}
