use domain::{DeviceRecord, DeviceStatus, Reachability};

#[test]
fn device_record_builds() {
    let device = DeviceRecord::new(" 10.0.0.1 ")
        .with_display_name("Gate camera")
        .with_region("North")
        .with_status(DeviceStatus::from(Reachability::Online));

    assert_eq!(device.identifier, "10.0.0.1");
    assert_eq!(device.display_name.as_deref(), Some("Gate camera"));
    assert_eq!(device.region.as_deref(), Some("North"));
    assert!(device.has_identifier());
    assert!(device.is_online());
    assert!(device.history.is_empty());
}
