//! 稳定的 DTO 与 API 响应契约。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 数据暂不可用（如设备清单未加载）的错误码。
pub const DATA_UNAVAILABLE: &str = "DATA.UNAVAILABLE";

/// 标准 API 响应封装。
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
}

/// 失败响应的错误体。
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code: code.into(),
                message: message.into(),
            }),
        }
    }

    /// 空结果 + 诊断信息（请求本身成功，只是没有可返回的数据）。
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            error: Some(ApiError {
                code: DATA_UNAVAILABLE.to_string(),
                message: message.into(),
            }),
        }
    }
}

/// 分组统计。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupSummaryDto {
    pub total: usize,
    pub online: usize,
    pub offline: usize,
}

/// 全局统计，分组统计以分组名为键平铺在同一层。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryDto {
    pub total_devices: usize,
    pub total_online: usize,
    pub total_offline: usize,
    #[serde(flatten)]
    pub groups: BTreeMap<String, GroupSummaryDto>,
}

/// 状态事件返回结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusEventDto {
    pub status: String,
    pub timestamp: String,
}

/// 设备返回结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceDto {
    pub identifier: String,
    pub display_name: Option<String>,
    pub region: Option<String>,
    pub status: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub history: Vec<StatusEventDto>,
}

/// 巡检返回结构（全量或按区域）。
#[derive(Debug, Clone, Serialize)]
pub struct FetchResponse {
    pub summary: SummaryDto,
    pub details: BTreeMap<String, Vec<DeviceDto>>,
}

/// 历史回放统计返回结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayStatsDto {
    pub identifier: String,
    pub uptime: String,
    pub downtime: String,
    pub total_downtime_duration: String,
    pub uptime_minutes: i64,
    pub downtime_minutes: i64,
    pub total_downtime_minutes: i64,
}

/// 区域列表项。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionDto {
    pub name: String,
    pub device_count: usize,
}

/// 清单重载结果。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogReloadDto {
    pub regions: usize,
    pub devices: usize,
    pub missing_identifier: usize,
}

/// 指标快照返回结构。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshotDto {
    pub probes_dispatched: u64,
    pub probe_failures: u64,
    pub probe_cache_hits: u64,
    pub identifiers_missing: u64,
    pub transitions_recorded: u64,
    pub history_writes: u64,
    pub history_write_failures: u64,
    pub history_dropped_malformed: u64,
    pub history_pruned: u64,
    pub fetch_cycles: u64,
}
