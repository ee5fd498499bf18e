//! 巡检指标快照：GET /metrics

use api_contract::{ApiResponse, MetricsSnapshotDto};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fleet_telemetry::metrics;

pub async fn get_metrics() -> Response {
    let snapshot = metrics().snapshot();
    (
        StatusCode::OK,
        Json(ApiResponse::success(MetricsSnapshotDto {
            probes_dispatched: snapshot.probes_dispatched,
            probe_failures: snapshot.probe_failures,
            probe_cache_hits: snapshot.probe_cache_hits,
            identifiers_missing: snapshot.identifiers_missing,
            transitions_recorded: snapshot.transitions_recorded,
            history_writes: snapshot.history_writes,
            history_write_failures: snapshot.history_write_failures,
            history_dropped_malformed: snapshot.history_dropped_malformed,
            history_pruned: snapshot.history_pruned,
            fetch_cycles: snapshot.fetch_cycles,
        })),
    )
        .into_response()
}
