//! 存储接口 Trait 定义
//!
//! 设计原则：
//! - `merge_and_save` 是唯一写入路径（读取 -> 合并 -> 裁剪 -> 整体写回）
//! - 实现方负责串行化同一存储上的并发合并写入
//! - 所有接口返回 StorageError
//! - 使用 async_trait 支持动态分发

use crate::error::StorageError;
use crate::retention::MergeReport;
use async_trait::async_trait;
use domain::{HistoryMap, StatusEvent};

/// 状态历史存储接口
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// 读取全部持久化历史（不存在时返回空映射）
    async fn load(&self) -> Result<HistoryMap, StorageError>;

    /// 合并写入
    ///
    /// 对 `incoming` 中的每个标识追加事件，按保留期裁剪全部序列，
    /// 然后整体替换持久化内容。
    async fn merge_and_save(&self, incoming: HistoryMap) -> Result<MergeReport, StorageError>;

    /// 读取单个标识的历史序列
    async fn history_of(&self, identifier: &str) -> Result<Vec<StatusEvent>, StorageError> {
        let mut history = self.load().await?;
        Ok(history.remove(identifier).unwrap_or_default())
    }

    /// 读取单个标识最近一条事件
    async fn latest(&self, identifier: &str) -> Result<Option<StatusEvent>, StorageError> {
        Ok(self.history_of(identifier).await?.pop())
    }
}
