//! 清单行规范化：字段名统一为小写下划线，取值去空白。

use domain::DeviceRecord;
use std::collections::BTreeMap;

/// 规范化后的清单行（字段名 -> 值）。
pub type CatalogRow = BTreeMap<String, String>;

pub const IDENTIFIER_FIELDS: &[&str] = &[
    "ip_address",
    "ip",
    "ipaddress",
    "identifier",
    "host",
    "hostname",
];
pub const DISPLAY_NAME_FIELDS: &[&str] = &["display_name", "name", "device_name"];
pub const REGION_FIELD: &str = "region";

/// `"IP Address "` -> `"ip_address"`。
pub fn normalize_field_name(raw: &str) -> String {
    let mut normalized = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for ch in raw.trim().chars() {
        if ch.is_whitespace() || matches!(ch, '_' | '-' | '.' | '/') {
            pending_separator = true;
            continue;
        }
        if pending_separator && !normalized.is_empty() {
            normalized.push('_');
        }
        pending_separator = false;
        normalized.extend(ch.to_lowercase());
    }
    normalized
}

/// 规范化一整行；空字段名和空值会被丢弃，重复字段保留先出现的值。
pub fn normalize_row<I, K, V>(raw: I) -> CatalogRow
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut row = CatalogRow::new();
    for (key, value) in raw {
        let key = normalize_field_name(key.as_ref());
        let value = value.as_ref().trim();
        if key.is_empty() || value.is_empty() {
            continue;
        }
        row.entry(key).or_insert_with(|| value.to_string());
    }
    row
}

/// 将规范化后的行映射为设备记录。
///
/// 区域优先取 `region` 列，否则使用分组名；未被识别的列保留为属性。
pub fn device_from_row(group: &str, row: &CatalogRow) -> DeviceRecord {
    let identifier = first_of(row, IDENTIFIER_FIELDS).unwrap_or_default();
    let mut device = DeviceRecord::new(identifier);
    device.display_name = first_of(row, DISPLAY_NAME_FIELDS);
    device.region = row
        .get(REGION_FIELD)
        .cloned()
        .or_else(|| Some(group.to_string()));
    device.attributes = row
        .iter()
        .filter(|(key, _)| {
            let key = key.as_str();
            key != REGION_FIELD
                && !IDENTIFIER_FIELDS.contains(&key)
                && !DISPLAY_NAME_FIELDS.contains(&key)
        })
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    device
}

fn first_of(row: &CatalogRow, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| row.get(*field).cloned())
}
