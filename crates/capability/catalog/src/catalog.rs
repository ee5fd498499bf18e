use crate::normalize::{CatalogRow, device_from_row};
use domain::DeviceRecord;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// 加载统计。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogReport {
    pub regions: usize,
    pub devices: usize,
    pub missing_identifier: usize,
}

/// 设备清单：分组名 -> 设备记录。
///
/// 一次加载后不可变，重载时整体替换。
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    groups: BTreeMap<String, Vec<DeviceRecord>>,
    report: CatalogReport,
}

impl Catalog {
    /// 从规范化后的行构建清单。
    ///
    /// 缺少标识的行仍然保留（计入总数），在巡检时标记为 `IdentifierMissing`。
    pub fn from_rows(rows: BTreeMap<String, Vec<CatalogRow>>) -> Self {
        let mut groups = BTreeMap::new();
        let mut report = CatalogReport::default();
        for (group, group_rows) in rows {
            let group = group.trim().to_string();
            if group.is_empty() {
                warn!(target: "fleet.catalog", rows = group_rows.len(), "rows without group name skipped");
                continue;
            }
            let mut devices = Vec::with_capacity(group_rows.len());
            for (index, row) in group_rows.iter().enumerate() {
                let device = device_from_row(&group, row);
                if !device.has_identifier() {
                    info!(target: "fleet.catalog", group = %group, row = index + 1, "catalog row has no identifier");
                    report.missing_identifier += 1;
                }
                devices.push(device);
            }
            report.devices += devices.len();
            groups.insert(group, devices);
        }
        report.regions = groups.len();
        Self { groups, report }
    }

    pub fn groups(&self) -> &BTreeMap<String, Vec<DeviceRecord>> {
        &self.groups
    }

    pub fn report(&self) -> CatalogReport {
        self.report
    }

    pub fn regions(&self) -> Vec<String> {
        self.groups.keys().cloned().collect()
    }

    /// 按名称查找分组（忽略大小写），返回规范的分组名。
    pub fn group(&self, name: &str) -> Option<(&str, &[DeviceRecord])> {
        let name = name.trim();
        if let Some((key, devices)) = self.groups.get_key_value(name) {
            return Some((key.as_str(), devices.as_slice()));
        }
        self.groups
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, devices)| (key.as_str(), devices.as_slice()))
    }

    /// 全部非空标识，排序去重。
    pub fn identifiers(&self) -> Vec<String> {
        self.groups
            .values()
            .flatten()
            .filter(|device| device.has_identifier())
            .map(|device| device.identifier.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 按标识查找设备（多处出现时返回第一处）。
    pub fn find(&self, identifier: &str) -> Option<&DeviceRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        self.groups
            .values()
            .flatten()
            .find(|device| device.identifier == identifier)
    }

    pub fn device_count(&self) -> usize {
        self.report.devices
    }
}
