//! 设备巡检 HTTP API 与请求追踪 ID。

mod handlers;
mod routes;
mod utils;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    body::Body,
    http::{HeaderValue, Request},
    middleware::{self, Next},
    response::Response,
};
use fleet_catalog::{CatalogError, CatalogSource};
use fleet_config::{AppConfig, HistoryBackend, ProbeMode};
use fleet_monitor::{MonitorService, spawn_monitor_loop};
use fleet_probe::{PingProbe, Probe, Prober, TcpProbe};
use fleet_storage::{HistoryStore, InMemoryHistoryStore, JsonFileHistoryStore, RetentionPolicy};
use fleet_telemetry::{init_tracing, new_request_ids};
use std::sync::Arc;
use tracing::{Instrument, info, warn};

#[derive(Clone)]
pub struct AppState {
    pub monitor: Arc<MonitorService>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在），便于直接 cargo run 启动
    dotenvy::dotenv().ok();
    // 从环境变量加载运行配置
    let config = AppConfig::from_env()?;
    // 初始化结构化日志
    init_tracing();

    let monitor = Arc::new(build_monitor(&config)?);
    // 启动时加载一次清单；失败时服务照常启动，查询返回数据不可用
    if config.catalog_path.is_some() {
        if let Err(err) = monitor.reload_catalog().await {
            warn!(error = %err, "device catalog unavailable at startup");
        }
    } else {
        warn!("FLEET_CATALOG_PATH not set, device catalog unavailable");
    }
    if let Some(interval) = config.poll_interval() {
        spawn_monitor_loop(monitor.clone(), interval);
    }

    let app = build_app(AppState { monitor });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(addr = %config.http_addr, "fleet api listening");
    axum::serve(listener, app).await?;
    Ok(())
}

/// 按配置组装存储、探测器与监控服务。
fn build_monitor(config: &AppConfig) -> Result<MonitorService, CatalogError> {
    let retention = RetentionPolicy::days(config.retention_days);
    let store: Arc<dyn HistoryStore> = match config.history_backend {
        HistoryBackend::File => Arc::new(JsonFileHistoryStore::new(
            config.history_path.clone(),
            retention,
        )),
        HistoryBackend::Memory => Arc::new(InMemoryHistoryStore::new(retention)),
    };
    let probe: Arc<dyn Probe> = match config.probe_mode {
        ProbeMode::Icmp => Arc::new(PingProbe::new(config.probe_timeout())),
        ProbeMode::Tcp => Arc::new(TcpProbe::new(
            config.probe_tcp_port,
            config.probe_timeout(),
        )),
    };

    let mut monitor = MonitorService::new(
        Prober::new(probe, config.probe_fan_out),
        store,
        config.timezone,
    );
    if let Some(path) = &config.catalog_path {
        monitor = monitor.with_catalog_source(CatalogSource::from_path(path.clone())?);
    }
    Ok(monitor)
}

/// 路由同时挂载在 `/` 与 `/api` 下。
pub fn build_app(state: AppState) -> Router {
    let api = routes::create_api_router();
    Router::new()
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        // 注入 request_id/trace_id
        .layer(middleware::from_fn(request_context))
}

async fn request_context(mut req: Request<Body>, next: Next) -> Response {
    // 生成 request_id 与 trace_id，并注入请求扩展与日志
    let ids = new_request_ids();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ids.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ids.request_id,
        trace_id = %ids.trace_id,
        method = %method,
        path = %path
    );

    let mut response = next.run(req).instrument(span).await;
    response.headers_mut().insert(
        "x-request-id",
        HeaderValue::from_str(&ids.request_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response.headers_mut().insert(
        "x-trace-id",
        HeaderValue::from_str(&ids.trace_id).unwrap_or_else(|_| HeaderValue::from_static("")),
    );
    response
}
