//! 路由定义
//!
//! - 健康检查：/health
//! - 巡检：/devices, /regions/{region}/devices
//! - 清单查询：/regions, /identifiers, /catalog/reload
//! - 历史：/devices/{identifier}/history, /devices/{identifier}/stats
//! - 指标：/metrics

use super::AppState;
use super::handlers::*;
use axum::{
    Router,
    routing::{get, post},
};

/// 创建 API 路由
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/devices", get(fetch_all_devices))
        .route("/regions", get(list_regions))
        .route("/regions/:region/devices", get(fetch_region_devices))
        .route("/identifiers", get(list_identifiers))
        .route("/devices/:identifier/history", get(get_device_history))
        .route("/devices/:identifier/stats", get(get_device_stats))
        .route("/catalog/reload", post(reload_catalog))
        .route("/metrics", get(get_metrics))
}
