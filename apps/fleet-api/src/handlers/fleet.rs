//! 巡检与清单查询 handlers
//!
//! - GET /devices - 全量巡检
//! - GET /regions/{region}/devices - 按区域巡检
//! - GET /regions - 区域列表
//! - GET /identifiers - 全部设备标识
//!
//! 清单未加载时返回 200 + `DATA.UNAVAILABLE`。

use crate::AppState;
use crate::utils::response::{fetch_to_dto, monitor_error, unavailable};
use api_contract::{ApiResponse, RegionDto};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

#[derive(serde::Deserialize)]
pub struct RegionPath {
    region: String,
}

pub async fn fetch_all_devices(State(state): State<AppState>) -> Response {
    match state.monitor.fetch_all().await {
        Ok(Some(result)) => {
            (StatusCode::OK, Json(ApiResponse::success(fetch_to_dto(result)))).into_response()
        }
        Ok(None) => unavailable(),
        Err(err) => monitor_error(err),
    }
}

pub async fn fetch_region_devices(
    State(state): State<AppState>,
    Path(path): Path<RegionPath>,
) -> Response {
    match state.monitor.fetch_by_region(&path.region).await {
        Ok(Some(result)) => {
            (StatusCode::OK, Json(ApiResponse::success(fetch_to_dto(result)))).into_response()
        }
        Ok(None) => unavailable(),
        Err(err) => monitor_error(err),
    }
}

pub async fn list_regions(State(state): State<AppState>) -> Response {
    let Some(regions) = state.monitor.list_regions().await else {
        return unavailable();
    };
    let items: Vec<RegionDto> = regions
        .into_iter()
        .map(|(name, device_count)| RegionDto { name, device_count })
        .collect();
    (StatusCode::OK, Json(ApiResponse::success(items))).into_response()
}

pub async fn list_identifiers(State(state): State<AppState>) -> Response {
    match state.monitor.list_all_identifiers().await {
        Some(identifiers) => {
            (StatusCode::OK, Json(ApiResponse::success(identifiers))).into_response()
        }
        None => unavailable(),
    }
}
