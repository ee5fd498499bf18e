//! 历史文件编解码。
//!
//! 持久化格式：`{ "<identifier>": [ { "status": "Online", "timestamp": "<RFC3339>" } ] }`。
//! 单条损坏的事件只会被丢弃，不影响同一序列或其他标识的事件。

use crate::error::StorageError;
use chrono::{DateTime, FixedOffset, NaiveDateTime};
use domain::{HistoryMap, Reachability, StatusEvent};
use serde_json::Value;
use tracing::warn;

/// 解码结果。
#[derive(Debug, Default)]
pub struct DecodedHistory {
    pub history: HistoryMap,
    pub dropped: usize,
}

/// 解码整个历史文件。
///
/// 根节点不是 JSON 对象时返回错误；单条事件无法解析时丢弃并计数。
pub fn decode_history(raw: &str) -> Result<DecodedHistory, StorageError> {
    let mut decoded = DecodedHistory::default();
    if raw.trim().is_empty() {
        return Ok(decoded);
    }
    let root: Value = serde_json::from_str(raw)?;
    let Value::Object(entries) = root else {
        return Err(StorageError::new("history root must be a JSON object"));
    };

    for (identifier, value) in entries {
        let Value::Array(items) = value else {
            warn!(target: "fleet.storage", identifier = %identifier, "history sequence is not an array, dropped");
            decoded.dropped += 1;
            continue;
        };
        let mut sequence = Vec::with_capacity(items.len());
        for item in &items {
            match decode_event(item) {
                Some(event) => sequence.push(event),
                None => {
                    warn!(target: "fleet.storage", identifier = %identifier, entry = %item, "malformed history entry dropped");
                    decoded.dropped += 1;
                }
            }
        }
        if !sequence.is_empty() {
            decoded.history.insert(identifier, sequence);
        }
    }
    Ok(decoded)
}

/// 解码单条事件，状态或时间戳无效时返回 None。
pub fn decode_event(value: &Value) -> Option<StatusEvent> {
    let status = value
        .get("status")
        .and_then(Value::as_str)
        .and_then(Reachability::parse)?;
    let timestamp = value
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(parse_timestamp)?;
    Some(StatusEvent::new(status, timestamp))
}

/// 解析 ISO-8601 时间戳；不带偏移的按 UTC 处理。
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp);
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc().fixed_offset())
}

/// 编码为带缩进的 JSON（键有序，便于 diff）。
pub fn encode_history(history: &HistoryMap) -> Result<String, StorageError> {
    Ok(serde_json::to_string_pretty(history)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_timestamp_is_utc() {
        let parsed = parse_timestamp("2024-05-01T10:00:00").expect("naive");
        assert_eq!(parsed.offset().local_minus_utc(), 0);
        assert_eq!(parsed.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn garbage_timestamp_is_rejected() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[test]
    fn root_must_be_object() {
        assert!(decode_history("[1, 2]").is_err());
        assert!(decode_history("{ not json").is_err());
        assert!(decode_history("   ").expect("empty").history.is_empty());
    }
}
