//! 状态历史内存实现（用于测试与 `FLEET_HISTORY_BACKEND=memory`）。

use crate::error::StorageError;
use crate::retention::{MergeReport, RetentionPolicy, merge_histories};
use crate::traits::HistoryStore;
use chrono::Utc;
use domain::HistoryMap;
use std::sync::RwLock;

pub struct InMemoryHistoryStore {
    history: RwLock<HistoryMap>,
    retention: RetentionPolicy,
}

impl InMemoryHistoryStore {
    pub fn new(retention: RetentionPolicy) -> Self {
        Self::seeded(HistoryMap::new(), retention)
    }

    /// 直接写入初始内容，不经过合并与裁剪。
    pub fn seeded(history: HistoryMap, retention: RetentionPolicy) -> Self {
        Self {
            history: RwLock::new(history),
            retention,
        }
    }
}

impl Default for InMemoryHistoryStore {
    fn default() -> Self {
        Self::new(RetentionPolicy::default())
    }
}

#[async_trait::async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn load(&self) -> Result<HistoryMap, StorageError> {
        let map = self
            .history
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        Ok(map.clone())
    }

    async fn merge_and_save(&self, incoming: HistoryMap) -> Result<MergeReport, StorageError> {
        let mut map = self
            .history
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        let persisted = std::mem::take(&mut *map);
        let (merged, report) =
            merge_histories(persisted, incoming, self.retention.cutoff(Utc::now()));
        *map = merged;
        fleet_telemetry::record_history_write();
        fleet_telemetry::record_history_pruned(report.pruned as u64);
        Ok(report)
    }
}
