//! 有界并发的批量探测。

use crate::Probe;
use domain::{DeviceRecord, DeviceStatus, Reachability};
use fleet_telemetry::{
    record_identifier_missing, record_probe_cache_hit, record_probe_dispatched,
    record_probe_failure,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// 默认最大并发探测数。
pub const DEFAULT_FAN_OUT: usize = 10;

/// 批量探测器。
///
/// 每次调用内：
/// - 同一标识只探测一次，重复出现直接复用结果
/// - 同时在途的探测不超过 `fan_out`
/// - 任何失败（探测错误、任务异常）都记为离线，不会让整批失败
#[derive(Clone)]
pub struct Prober {
    probe: Arc<dyn Probe>,
    fan_out: usize,
}

impl Prober {
    pub fn new(probe: Arc<dyn Probe>, fan_out: usize) -> Self {
        Self {
            probe,
            fan_out: fan_out.max(1),
        }
    }

    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    /// 探测一批标识，返回 标识 -> 可达性（空白标识被忽略）。
    ///
    /// 探测批次在独立任务中运行：调用方提前放弃等待时，
    /// 已发起的探测仍会执行完毕。
    pub async fn resolve<I, S>(&self, identifiers: I) -> HashMap<String, Reachability>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dispatched = HashSet::new();
        let mut unique = Vec::new();
        for identifier in identifiers {
            let identifier = identifier.as_ref().trim();
            if identifier.is_empty() {
                continue;
            }
            if !dispatched.insert(identifier.to_string()) {
                record_probe_cache_hit();
                continue;
            }
            unique.push(identifier.to_string());
        }
        if unique.is_empty() {
            return HashMap::new();
        }

        let batch = tokio::spawn(probe_batch(self.probe.clone(), self.fan_out, unique));
        match batch.await {
            Ok(results) => results,
            Err(err) => {
                warn!(target: "fleet.probe", error = %err, "probe batch aborted, marking offline");
                record_probe_failure();
                dispatched
                    .into_iter()
                    .map(|identifier| (identifier, Reachability::Offline))
                    .collect()
            }
        }
    }

    /// 原地解析设备状态。
    ///
    /// 没有标识的设备标记为 `IdentifierMissing`，不会发起探测。
    /// 返回缺少标识的设备数量。
    pub async fn resolve_devices(&self, devices: &mut [DeviceRecord]) -> usize {
        let identifiers: Vec<String> = devices
            .iter()
            .filter(|device| device.has_identifier())
            .map(|device| device.identifier.clone())
            .collect();
        let results = self.resolve(identifiers).await;

        let mut missing = 0usize;
        for device in devices.iter_mut() {
            if !device.has_identifier() {
                device.status = DeviceStatus::IdentifierMissing;
                missing += 1;
                continue;
            }
            let status = results
                .get(device.identifier.trim())
                .copied()
                .unwrap_or(Reachability::Offline);
            device.status = DeviceStatus::from(status);
        }
        if missing > 0 {
            record_identifier_missing(missing as u64);
            warn!(target: "fleet.probe", missing, "devices without identifier were not probed");
        }
        missing
    }
}

/// 有界并发地探测一组已去重的标识，等待全部完成。
async fn probe_batch(
    probe: Arc<dyn Probe>,
    fan_out: usize,
    identifiers: Vec<String>,
) -> HashMap<String, Reachability> {
    let semaphore = Arc::new(Semaphore::new(fan_out));
    let mut tasks = JoinSet::new();
    for identifier in &identifiers {
        let probe = probe.clone();
        let semaphore = semaphore.clone();
        let identifier = identifier.clone();
        tasks.spawn(async move {
            let Ok(_permit) = semaphore.acquire_owned().await else {
                return (identifier, None);
            };
            record_probe_dispatched();
            let outcome = probe.probe(&identifier).await;
            (identifier, Some(outcome))
        });
    }

    let mut results = HashMap::with_capacity(identifiers.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((identifier, Some(Ok(status)))) => {
                results.insert(identifier, status);
            }
            Ok((identifier, Some(Err(err)))) => {
                warn!(target: "fleet.probe", identifier = %identifier, error = %err, "probe failed, marking offline");
                record_probe_failure();
                results.insert(identifier, Reachability::Offline);
            }
            Ok((identifier, None)) => {
                warn!(target: "fleet.probe", identifier = %identifier, "probe permit unavailable, marking offline");
                record_probe_failure();
                results.insert(identifier, Reachability::Offline);
            }
            Err(err) => {
                warn!(target: "fleet.probe", error = %err, "probe task aborted");
                record_probe_failure();
            }
        }
    }

    // 异常退出的任务拿不到标识，这里统一补为离线
    for identifier in identifiers {
        results.entry(identifier).or_insert(Reachability::Offline);
    }
    debug!(target: "fleet.probe", probed = results.len(), "probe batch finished");
    results
}
