//! 巡检结果汇总。

use domain::{DeviceRecord, GroupSummary, Summary};
use std::collections::BTreeMap;

/// 按分组统计在线/离线数量。
///
/// 非 `Online` 的状态（含 `Unknown` 和 `IdentifierMissing`）都计为离线。
pub fn summarize(groups: &BTreeMap<String, Vec<DeviceRecord>>) -> Summary {
    let mut summary = Summary::default();
    for (name, devices) in groups {
        let total = devices.len();
        let online = devices.iter().filter(|device| device.is_online()).count();
        let group = GroupSummary {
            total,
            online,
            offline: total - online,
        };
        summary.total_devices += group.total;
        summary.total_online += group.online;
        summary.total_offline += group.offline;
        summary.groups.insert(name.clone(), group);
    }
    summary
}
