//! 调用系统 `ping` 的 ICMP 探测。

use crate::error::ProbeError;
use crate::Probe;
use async_trait::async_trait;
use domain::Reachability;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// 单包 ICMP 探测，退出码为 0 视为在线。
#[derive(Debug, Clone)]
pub struct PingProbe {
    timeout: Duration,
}

impl PingProbe {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Probe for PingProbe {
    async fn probe(&self, identifier: &str) -> Result<Reachability, ProbeError> {
        let target = identifier.trim();
        if target.is_empty() || target.starts_with('-') {
            return Err(ProbeError::InvalidTarget(identifier.to_string()));
        }
        let mut command = Command::new("ping");
        command
            .args(ping_args(target, self.timeout))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        // ping 自身的 -W 并不总是可靠，外层再兜一次超时
        let guard = self.timeout + Duration::from_secs(1);
        match tokio::time::timeout(guard, command.status()).await {
            Ok(status) => {
                let status = status.map_err(ProbeError::Spawn)?;
                Ok(if status.success() {
                    Reachability::Online
                } else {
                    Reachability::Offline
                })
            }
            Err(_) => Ok(Reachability::Offline),
        }
    }
}

#[cfg(target_os = "windows")]
fn ping_args(target: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-n".to_string(),
        "1".to_string(),
        "-w".to_string(),
        timeout.as_millis().max(1).to_string(),
        target.to_string(),
    ]
}

#[cfg(target_os = "macos")]
fn ping_args(target: &str, timeout: Duration) -> Vec<String> {
    vec![
        "-n".to_string(),
        "-c".to_string(),
        "1".to_string(),
        "-W".to_string(),
        timeout.as_millis().max(1).to_string(),
        target.to_string(),
    ]
}

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
fn ping_args(target: &str, timeout: Duration) -> Vec<String> {
    // Linux iputils 的 -W 单位为秒
    let seconds = timeout.as_millis().div_ceil(1000).max(1);
    vec![
        "-n".to_string(),
        "-c".to_string(),
        "1".to_string(),
        "-W".to_string(),
        seconds.to_string(),
        target.to_string(),
    ]
}
