use async_trait::async_trait;
use domain::{DeviceRecord, DeviceStatus, Reachability};
use fleet_probe::{Probe, ProbeError, Prober, TcpProbe};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
struct RecordingProbe {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    calls: Mutex<HashMap<String, usize>>,
}

impl RecordingProbe {
    fn calls_for(&self, identifier: &str) -> usize {
        self.calls
            .lock()
            .expect("calls")
            .get(identifier)
            .copied()
            .unwrap_or(0)
    }

    fn total_calls(&self) -> usize {
        self.calls.lock().expect("calls").values().sum()
    }
}

#[async_trait]
impl Probe for RecordingProbe {
    async fn probe(&self, identifier: &str) -> Result<Reachability, ProbeError> {
        *self
            .calls
            .lock()
            .expect("calls")
            .entry(identifier.to_string())
            .or_default() += 1;
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(15)).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if identifier.starts_with("bad") {
            return Err(ProbeError::InvalidTarget(identifier.to_string()));
        }
        if identifier.ends_with(".9") {
            return Ok(Reachability::Offline);
        }
        Ok(Reachability::Online)
    }
}

#[tokio::test]
async fn in_flight_probes_never_exceed_fan_out() {
    let probe = Arc::new(RecordingProbe::default());
    let prober = Prober::new(probe.clone(), 10);
    let identifiers: Vec<String> = (0..50).map(|index| format!("10.0.1.{index}")).collect();

    let results = prober.resolve(&identifiers).await;

    assert_eq!(results.len(), 50);
    assert_eq!(probe.total_calls(), 50);
    let max = probe.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 10, "max in flight was {max}");
    assert!(max > 1, "probes should overlap");
}

#[tokio::test]
async fn shared_identifier_is_probed_once() {
    let probe = Arc::new(RecordingProbe::default());
    let prober = Prober::new(probe.clone(), 4);

    let results = prober
        .resolve(["10.0.0.1", "10.0.0.2", "10.0.0.1", " 10.0.0.1 "])
        .await;

    assert_eq!(probe.calls_for("10.0.0.1"), 1);
    assert_eq!(results.len(), 2);
    assert_eq!(results["10.0.0.1"], Reachability::Online);
}

#[tokio::test]
async fn probe_errors_become_offline() {
    let probe = Arc::new(RecordingProbe::default());
    let prober = Prober::new(probe, 2);

    let results = prober.resolve(["bad-host", "10.0.0.9", "10.0.0.1"]).await;

    assert_eq!(results["bad-host"], Reachability::Offline);
    assert_eq!(results["10.0.0.9"], Reachability::Offline);
    assert_eq!(results["10.0.0.1"], Reachability::Online);
}

#[tokio::test]
async fn zero_fan_out_is_clamped() {
    let prober = Prober::new(Arc::new(RecordingProbe::default()), 0);
    assert_eq!(prober.fan_out(), 1);
    let results = prober.resolve(["10.0.0.1"]).await;
    assert_eq!(results["10.0.0.1"], Reachability::Online);
}

#[tokio::test]
async fn devices_without_identifier_are_not_probed() {
    let probe = Arc::new(RecordingProbe::default());
    let prober = Prober::new(probe.clone(), 4);
    let mut devices = vec![
        DeviceRecord::new("10.0.0.1"),
        DeviceRecord::new("  "),
        DeviceRecord::new("10.0.0.9"),
        DeviceRecord::new("10.0.0.1"),
    ];

    let missing = prober.resolve_devices(&mut devices).await;

    assert_eq!(missing, 1);
    assert_eq!(devices[0].status, DeviceStatus::Online);
    assert_eq!(devices[1].status, DeviceStatus::IdentifierMissing);
    assert_eq!(devices[2].status, DeviceStatus::Offline);
    assert_eq!(devices[3].status, DeviceStatus::Online);
    assert_eq!(probe.total_calls(), 2);
}

#[tokio::test]
async fn tcp_probe_sees_listening_port() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let probe = TcpProbe::new(1, Duration::from_secs(1));

    let status = probe
        .probe(&format!("127.0.0.1:{port}"))
        .await
        .expect("probe");
    assert_eq!(status, Reachability::Online);
}

#[tokio::test]
async fn tcp_probe_rejects_bad_port() {
    let probe = TcpProbe::new(80, Duration::from_millis(100));
    let err = probe.probe("gw.local:http").await.expect_err("invalid");
    assert!(matches!(err, ProbeError::InvalidTarget(_)));
}

/// 每次探测耗时固定，只统计完成次数。
#[derive(Default)]
struct SlowProbe {
    completed: AtomicUsize,
}

#[async_trait]
impl Probe for SlowProbe {
    async fn probe(&self, _identifier: &str) -> Result<Reachability, ProbeError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.completed.fetch_add(1, Ordering::SeqCst);
        Ok(Reachability::Online)
    }
}

#[tokio::test]
async fn abandoned_batch_still_finishes_in_flight_checks() {
    let probe = Arc::new(SlowProbe::default());
    let prober = Prober::new(probe.clone(), 10);
    let identifiers: Vec<String> = (0..10).map(|index| format!("10.0.3.{index}")).collect();

    let abandoned = tokio::time::timeout(Duration::from_millis(20), prober.resolve(&identifiers)).await;
    assert!(abandoned.is_err());

    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(probe.completed.load(Ordering::SeqCst), 10);
}
