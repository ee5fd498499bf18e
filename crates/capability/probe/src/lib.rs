//! 设备可达性探测。
//!
//! - `Probe`：单个标识的探测接口
//! - `PingProbe` / `TcpProbe`：两种实现
//! - `Prober`：有界并发、单次调用内去重的批量探测

mod error;
mod icmp;
mod prober;
mod tcp;

use async_trait::async_trait;
use domain::Reachability;

pub use error::ProbeError;
pub use icmp::PingProbe;
pub use prober::{DEFAULT_FAN_OUT, Prober};
pub use tcp::TcpProbe;

/// 单个标识的可达性探测。
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(&self, identifier: &str) -> Result<Reachability, ProbeError>;
}
