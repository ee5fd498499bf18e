//! 设备历史 handlers
//!
//! - GET /devices/{identifier}/history - 状态历史（展示时区）
//! - GET /devices/{identifier}/stats - 历史回放统计

use crate::AppState;
use crate::utils::response::{device_to_dto, monitor_error, not_found_error, replay_to_dto, unavailable};
use api_contract::ApiResponse;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DeviceRecord;

#[derive(serde::Deserialize)]
pub struct DevicePath {
    identifier: String,
}

pub async fn get_device_history(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
) -> Response {
    let mut device = match lookup_device(&state, &path.identifier).await {
        Ok(device) => device,
        Err(response) => return response,
    };
    if let Err(err) = state.monitor.get_history(&mut device).await {
        return monitor_error(err);
    }
    (StatusCode::OK, Json(ApiResponse::success(device_to_dto(device)))).into_response()
}

pub async fn get_device_stats(
    State(state): State<AppState>,
    Path(path): Path<DevicePath>,
) -> Response {
    let device = match lookup_device(&state, &path.identifier).await {
        Ok(device) => device,
        Err(response) => return response,
    };
    match state.monitor.get_replay_stats(&device).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(replay_to_dto(device.identifier, stats))),
        )
            .into_response(),
        Err(err) => monitor_error(err),
    }
}

/// 清单未加载 -> 数据不可用；清单中不存在 -> 404。
async fn lookup_device(state: &AppState, identifier: &str) -> Result<DeviceRecord, Response> {
    if state.monitor.catalog().await.is_none() {
        return Err(unavailable());
    }
    state
        .monitor
        .find_device(identifier)
        .await
        .ok_or_else(not_found_error)
}
