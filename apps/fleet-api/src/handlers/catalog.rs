//! 清单重载：POST /catalog/reload

use crate::AppState;
use crate::utils::response::monitor_error;
use api_contract::{ApiResponse, CatalogReloadDto};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

pub async fn reload_catalog(State(state): State<AppState>) -> Response {
    match state.monitor.reload_catalog().await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(CatalogReloadDto {
                regions: report.regions,
                devices: report.devices,
                missing_identifier: report.missing_identifier,
            })),
        )
            .into_response(),
        Err(err) => monitor_error(err),
    }
}
