//! # Fleet Storage 模块
//!
//! 设备状态历史的持久化层。
//!
//! ## 架构设计
//!
//! 1. **接口抽象层** (`traits.rs`)：`HistoryStore` 异步 Trait
//! 2. **合并规则** (`retention.rs`)：追加、去重、相邻折叠、保留期裁剪
//! 3. **编解码** (`codec.rs`)：JSON 文件格式与逐条容错解码
//! 4. **错误处理层** (`error.rs`)：统一的存储错误类型
//! 5. **实现层**：
//!    - `json_file`：单个 JSON 文件（默认后端）
//!    - `in_memory/`：内存实现（测试和演示）
//!
//! ## 写入语义
//!
//! 每次 `merge_and_save` 都是 读取 -> 合并 -> 裁剪 -> 整体写回。
//! 写回后满足：
//! - 同一标识相邻两条事件状态不同
//! - 不存在早于 `now - retention` 的事件
//! - 不存在空序列
//!
//! ## 使用示例
//!
//! ```rust,ignore
//! use fleet_storage::{HistoryStore, JsonFileHistoryStore, RetentionPolicy};
//!
//! let store = JsonFileHistoryStore::new("data/status_history.json", RetentionPolicy::days(30));
//! let history = store.history_of("10.0.0.1").await?;
//! ```

pub mod codec;
pub mod error;
pub mod in_memory;
pub mod json_file;
pub mod retention;
pub mod traits;

pub use codec::*;
pub use error::*;
pub use in_memory::InMemoryHistoryStore;
pub use json_file::JsonFileHistoryStore;
pub use retention::*;
pub use traits::*;
