//! 追踪与请求 ID 生成。

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing_subscriber::{EnvFilter, fmt};

/// 请求级追踪标识。
#[derive(Debug, Clone)]
pub struct RequestIds {
    pub request_id: String,
    pub trace_id: String,
}

/// 巡检指标快照。
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsSnapshot {
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

/// 巡检指标（进程内计数器）。
pub struct TelemetryMetrics {
    probes_dispatched: AtomicU64,
    probe_failures: AtomicU64,
    probe_cache_hits: AtomicU64,
    identifiers_missing: AtomicU64,
    transitions_recorded: AtomicU64,
    history_writes: AtomicU64,
    history_write_failures: AtomicU64,
    history_dropped_malformed: AtomicU64,
    history_pruned: AtomicU64,
    fetch_cycles: AtomicU64,
}

impl TelemetryMetrics {
    pub fn new() -> Self {
        Self {
            probes_dispatched: AtomicU64::new(0),
            probe_failures: AtomicU64::new(0),
            probe_cache_hits: AtomicU64::new(0),
            identifiers_missing: AtomicU64::new(0),
            transitions_recorded: AtomicU64::new(0),
            history_writes: AtomicU64::new(0),
            history_write_failures: AtomicU64::new(0),
            history_dropped_malformed: AtomicU64::new(0),
            history_pruned: AtomicU64::new(0),
            fetch_cycles: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            probes_dispatched: self.probes_dispatched.load(Ordering::Relaxed),
            probe_failures: self.probe_failures.load(Ordering::Relaxed),
            probe_cache_hits: self.probe_cache_hits.load(Ordering::Relaxed),
            identifiers_missing: self.identifiers_missing.load(Ordering::Relaxed),
            transitions_recorded: self.transitions_recorded.load(Ordering::Relaxed),
            history_writes: self.history_writes.load(Ordering::Relaxed),
            history_write_failures: self.history_write_failures.load(Ordering::Relaxed),
            history_dropped_malformed: self.history_dropped_malformed.load(Ordering::Relaxed),
            history_pruned: self.history_pruned.load(Ordering::Relaxed),
            fetch_cycles: self.fetch_cycles.load(Ordering::Relaxed),
        }
    }
}

impl Default for TelemetryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

static METRICS: OnceLock<TelemetryMetrics> = OnceLock::new();

/// 获取全局指标实例。
pub fn metrics() -> &'static TelemetryMetrics {
    METRICS.get_or_init(TelemetryMetrics::new)
}

/// 初始化 tracing（默认 info）。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(filter).try_init();
}

/// 生成新的 request_id 与 trace_id。
pub fn new_request_ids() -> RequestIds {
    RequestIds {
        request_id: uuid::Uuid::new_v4().to_string(),
        trace_id: uuid::Uuid::new_v4().to_string(),
    }
}

/// 记录实际发出的探测次数。
pub fn record_probe_dispatched() {
    metrics().probes_dispatched.fetch_add(1, Ordering::Relaxed);
}

/// 记录探测失败（已降级为 Offline）次数。
pub fn record_probe_failure() {
    metrics().probe_failures.fetch_add(1, Ordering::Relaxed);
}

/// 记录单次调用缓存命中次数。
pub fn record_probe_cache_hit() {
    metrics().probe_cache_hits.fetch_add(1, Ordering::Relaxed);
}

/// 记录缺少标识而跳过探测的设备数。
pub fn record_identifier_missing(count: u64) {
    metrics()
        .identifiers_missing
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录写入的状态迁移条数。
pub fn record_transitions(count: u64) {
    metrics()
        .transitions_recorded
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录历史合并写入成功次数。
pub fn record_history_write() {
    metrics().history_writes.fetch_add(1, Ordering::Relaxed);
}

/// 记录历史合并写入失败次数。
pub fn record_history_write_failure() {
    metrics()
        .history_write_failures
        .fetch_add(1, Ordering::Relaxed);
}

/// 记录因格式错误被丢弃的历史条目数。
pub fn record_history_dropped_malformed(count: u64) {
    metrics()
        .history_dropped_malformed
        .fetch_add(count, Ordering::Relaxed);
}

/// 记录因超出保留期被裁剪的历史条目数。
pub fn record_history_pruned(count: u64) {
    metrics().history_pruned.fetch_add(count, Ordering::Relaxed);
}

/// 记录完成的巡检轮次。
pub fn record_fetch_cycle() {
    metrics().fetch_cycles.fetch_add(1, Ordering::Relaxed);
}
