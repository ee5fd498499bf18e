//! HTTP 响应辅助函数和 DTO 转换
//!
//! - 错误响应：bad_request_error, not_found_error, unavailable, monitor_error
//! - DTO 转换：device_to_dto, summary_to_dto, fetch_to_dto, replay_to_dto

use api_contract::{
    ApiResponse, DeviceDto, FetchResponse, GroupSummaryDto, ReplayStatsDto, StatusEventDto,
    SummaryDto,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::{DeviceRecord, ReplayStats, StatusEvent, Summary, format_duration};
use fleet_monitor::{FetchResult, MonitorError};

/// 错误请求响应
pub fn bad_request_error(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<()>::error("INVALID.REQUEST", message.into())),
    )
        .into_response()
}

/// 资源未找到错误响应
pub fn not_found_error() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ApiResponse::<()>::error("RESOURCE.NOT_FOUND", "not found")),
    )
        .into_response()
}

/// 数据不可用（清单未加载）：200 + 空数据 + 诊断
pub fn unavailable() -> Response {
    (
        StatusCode::OK,
        Json(ApiResponse::<()>::unavailable("device catalog not loaded")),
    )
        .into_response()
}

/// 监控服务错误响应
pub fn monitor_error(err: MonitorError) -> Response {
    match err {
        MonitorError::RegionNotFound(_) => not_found_error(),
        MonitorError::CatalogNotConfigured => bad_request_error(err.to_string()),
        other => {
            tracing::error!(error = %other, "request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::error("INTERNAL.ERROR", other.to_string())),
            )
                .into_response()
        }
    }
}

/// StatusEvent 转 StatusEventDto
pub fn event_to_dto(event: &StatusEvent) -> StatusEventDto {
    StatusEventDto {
        status: event.status.as_str().to_string(),
        timestamp: event.timestamp.to_rfc3339(),
    }
}

/// DeviceRecord 转 DeviceDto
pub fn device_to_dto(record: DeviceRecord) -> DeviceDto {
    DeviceDto {
        history: record.history.iter().map(event_to_dto).collect(),
        identifier: record.identifier,
        display_name: record.display_name,
        region: record.region,
        status: record.status.as_str().to_string(),
        attributes: record.attributes,
    }
}

/// Summary 转 SummaryDto
pub fn summary_to_dto(summary: Summary) -> SummaryDto {
    SummaryDto {
        total_devices: summary.total_devices,
        total_online: summary.total_online,
        total_offline: summary.total_offline,
        groups: summary
            .groups
            .into_iter()
            .map(|(name, group)| {
                (
                    name,
                    GroupSummaryDto {
                        total: group.total,
                        online: group.online,
                        offline: group.offline,
                    },
                )
            })
            .collect(),
    }
}

/// FetchResult 转 FetchResponse
pub fn fetch_to_dto(result: FetchResult) -> FetchResponse {
    FetchResponse {
        summary: summary_to_dto(result.summary),
        details: result
            .details
            .into_iter()
            .map(|(name, devices)| (name, devices.into_iter().map(device_to_dto).collect()))
            .collect(),
    }
}

/// ReplayStats 转 ReplayStatsDto
pub fn replay_to_dto(identifier: String, stats: ReplayStats) -> ReplayStatsDto {
    ReplayStatsDto {
        identifier,
        uptime: format_duration(stats.uptime),
        downtime: format_duration(stats.downtime),
        total_downtime_duration: format_duration(stats.total_downtime_duration),
        uptime_minutes: stats.uptime.num_minutes().max(0),
        downtime_minutes: stats.downtime.num_minutes().max(0),
        total_downtime_minutes: stats.total_downtime_duration.num_minutes().max(0),
    }
}
