use crate::service::MonitorService;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

/// 启动后台巡检循环，单轮失败只记录日志。
pub fn spawn_monitor_loop(
    service: Arc<MonitorService>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    let interval = interval.max(Duration::from_secs(1));
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(target: "fleet.monitor", interval_secs = interval.as_secs(), "monitor loop started");
        loop {
            ticker.tick().await;
            match service.run_cycle().await {
                Ok(Some(summary)) => {
                    info!(
                        target: "fleet.monitor",
                        total = summary.total_devices,
                        online = summary.total_online,
                        offline = summary.total_offline,
                        "monitor cycle finished"
                    );
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(target: "fleet.monitor", error = %err, "monitor cycle failed");
                }
            }
        }
    })
}
