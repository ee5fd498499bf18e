//! JSON 文件存储实现（默认后端）。
//!
//! - 文件不存在视为空历史
//! - 写入先落临时文件再 rename，读方不会看到半写入的文件
//! - 同一实例内的合并写入由 `write_lock` 串行化

use crate::codec::{decode_history, encode_history};
use crate::error::StorageError;
use crate::retention::{MergeReport, RetentionPolicy, merge_histories};
use crate::traits::HistoryStore;
use chrono::Utc;
use domain::HistoryMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

pub struct JsonFileHistoryStore {
    path: PathBuf,
    retention: RetentionPolicy,
    write_lock: Mutex<()>,
}

impl JsonFileHistoryStore {
    pub fn new(path: impl Into<PathBuf>, retention: RetentionPolicy) -> Self {
        Self {
            path: path.into(),
            retention,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_persisted(&self) -> Result<HistoryMap, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(HistoryMap::new()),
            Err(err) => {
                return Err(StorageError::new(format!(
                    "read {}: {}",
                    self.path.display(),
                    err
                )));
            }
        };
        let decoded = decode_history(&raw).map_err(|err| {
            StorageError::new(format!("decode {}: {}", self.path.display(), err))
        })?;
        if decoded.dropped > 0 {
            warn!(
                target: "fleet.storage",
                path = %self.path.display(),
                dropped = decoded.dropped,
                "malformed history entries skipped"
            );
            fleet_telemetry::record_history_dropped_malformed(decoded.dropped as u64);
        }
        Ok(decoded.history)
    }

    async fn persist(&self, history: &HistoryMap) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let body = encode_history(history)?;
        let tmp = temp_path(&self.path);
        tokio::fs::write(&tmp, body).await?;
        if let Err(err) = tokio::fs::rename(&tmp, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp).await {
                debug!(target: "fleet.storage", path = %tmp.display(), error = %cleanup, "temp file cleanup failed");
            }
            return Err(err.into());
        }
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[async_trait::async_trait]
impl HistoryStore for JsonFileHistoryStore {
    async fn load(&self) -> Result<HistoryMap, StorageError> {
        self.read_persisted().await
    }

    async fn merge_and_save(&self, incoming: HistoryMap) -> Result<MergeReport, StorageError> {
        let _guard = self.write_lock.lock().await;
        let persisted = self.read_persisted().await?;
        let (merged, report) =
            merge_histories(persisted, incoming, self.retention.cutoff(Utc::now()));
        if let Err(err) = self.persist(&merged).await {
            fleet_telemetry::record_history_write_failure();
            warn!(target: "fleet.storage", path = %self.path.display(), error = %err, "history write failed");
            return Err(err);
        }
        fleet_telemetry::record_history_write();
        fleet_telemetry::record_history_pruned(report.pruned as u64);
        debug!(
            target: "fleet.storage",
            appended = report.appended,
            duplicates = report.duplicates,
            collapsed = report.collapsed,
            pruned = report.pruned,
            identifiers = merged.len(),
            "history merged"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_sits_next_to_target() {
        let tmp = temp_path(Path::new("data/status_history.json"));
        assert_eq!(tmp, PathBuf::from("data/status_history.json.tmp"));
    }

    #[tokio::test]
    async fn failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        // 目标是非空目录，rename 必然失败
        let target = dir.path().join("history.json");
        std::fs::create_dir(&target).expect("dir");
        std::fs::write(target.join("keep"), "x").expect("file");

        let store = JsonFileHistoryStore::new(&target, RetentionPolicy::default());
        let result = store.persist(&HistoryMap::new()).await;
        assert!(result.is_err());
        assert!(!temp_path(&target).exists());
        assert!(target.join("keep").exists());
    }
}
