//! 状态迁移检测与写入。
//!
//! 只有当设备当前状态与其最近一条历史事件不同（或没有历史）时才写入。
//! 事件时间戳在写入时取当前时间（固定目标时区），而不是探测时刻。
//!
//! 读取最近状态、判断是否迁移、合并写入三步在 `decide_lock` 下完成，
//! 共享同一个 tracker 的并发巡检不会基于过期的读取做判断。

use chrono_tz::Tz;
use domain::{DeviceRecord, HistoryMap, Reachability, StatusEvent, now_in};
use fleet_storage::{HistoryStore, StorageError};
use fleet_telemetry::record_transitions;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

#[derive(Clone)]
pub struct StatusTracker {
    store: Arc<dyn HistoryStore>,
    timezone: Tz,
    decide_lock: Arc<Mutex<()>>,
}

impl StatusTracker {
    pub fn new(store: Arc<dyn HistoryStore>, timezone: Tz) -> Self {
        Self {
            store,
            timezone,
            decide_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// 单设备迁移检测，返回是否写入了新事件。
    pub async fn record_if_changed(&self, device: &DeviceRecord) -> Result<bool, StorageError> {
        let Some((identifier, status)) = recordable(device) else {
            return Ok(false);
        };
        let _guard = self.decide_lock.lock().await;
        let latest = self.store.latest(identifier).await?;
        if latest.is_some_and(|event| event.status == status) {
            debug!(target: "fleet.tracker", identifier, status = %status, "status unchanged");
            return Ok(false);
        }
        self.write(identifier, status).await?;
        record_transitions(1);
        info!(target: "fleet.tracker", identifier, status = %status, "status transition recorded");
        Ok(true)
    }

    /// 强制追加一条事件，不做迁移判断。
    pub async fn append_event(
        &self,
        device: &DeviceRecord,
        status: Reachability,
    ) -> Result<StatusEvent, StorageError> {
        let identifier = device.identifier.trim();
        if identifier.is_empty() {
            return Err(StorageError::new("cannot append history for a device without identifier"));
        }
        let _guard = self.decide_lock.lock().await;
        self.write(identifier, status).await
    }

    /// 整批迁移检测：一次读取、一次合并写入。
    ///
    /// 同一标识重复出现时以第一个设备为准。返回写入的迁移数量。
    pub async fn record_batch(&self, devices: &[DeviceRecord]) -> Result<usize, StorageError> {
        let _guard = self.decide_lock.lock().await;
        let persisted = self.store.load().await?;
        let mut changed: Vec<(&str, Reachability)> = Vec::new();
        for device in devices {
            let Some((identifier, status)) = recordable(device) else {
                continue;
            };
            if changed.iter().any(|(seen, _)| *seen == identifier) {
                continue;
            }
            let last = persisted
                .get(identifier)
                .and_then(|sequence| sequence.last())
                .map(|event| event.status);
            if last == Some(status) {
                continue;
            }
            changed.push((identifier, status));
        }
        if changed.is_empty() {
            return Ok(0);
        }

        let timestamp = now_in(&self.timezone);
        let incoming: HistoryMap = changed
            .iter()
            .map(|(identifier, status)| {
                (identifier.to_string(), vec![StatusEvent::new(*status, timestamp)])
            })
            .collect();
        self.store.merge_and_save(incoming).await?;

        let count = changed.len();
        record_transitions(count as u64);
        info!(target: "fleet.tracker", transitions = count, "status transitions recorded");
        Ok(count)
    }

    async fn write(&self, identifier: &str, status: Reachability) -> Result<StatusEvent, StorageError> {
        let event = StatusEvent::new(status, now_in(&self.timezone));
        let mut incoming = HistoryMap::new();
        incoming.insert(identifier.to_string(), vec![event.clone()]);
        self.store.merge_and_save(incoming).await?;
        Ok(event)
    }
}

fn recordable(device: &DeviceRecord) -> Option<(&str, Reachability)> {
    let identifier = device.identifier.trim();
    if identifier.is_empty() {
        return None;
    }
    device.status.reachability().map(|status| (identifier, status))
}
