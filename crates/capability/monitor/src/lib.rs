//! 监控编排：清单 -> 探测 -> 迁移记录 -> 汇总，以及历史查询与回放。

mod error;
mod service;
mod worker;

pub use error::MonitorError;
pub use service::{FetchResult, MonitorService};
pub use worker::spawn_monitor_loop;
