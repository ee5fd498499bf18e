use crate::error::MonitorError;
use chrono_tz::Tz;
use domain::{DeviceRecord, ReplayStats, StatusEvent, Summary, to_timezone};
use fleet_catalog::{Catalog, CatalogReport, CatalogSource};
use fleet_probe::Prober;
use fleet_stats::{compute_stats, summarize};
use fleet_storage::HistoryStore;
use fleet_telemetry::record_fetch_cycle;
use fleet_tracker::StatusTracker;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// 一次巡检的结果。
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub summary: Summary,
    pub details: BTreeMap<String, Vec<DeviceRecord>>,
}

/// 监控服务：持有清单、探测器与历史存储，对外提供查询入口。
pub struct MonitorService {
    catalog: RwLock<Option<Arc<Catalog>>>,
    catalog_source: Option<CatalogSource>,
    prober: Prober,
    tracker: StatusTracker,
    store: Arc<dyn HistoryStore>,
    timezone: Tz,
}

impl MonitorService {
    pub fn new(prober: Prober, store: Arc<dyn HistoryStore>, timezone: Tz) -> Self {
        Self {
            catalog: RwLock::new(None),
            catalog_source: None,
            prober,
            tracker: StatusTracker::new(store.clone(), timezone),
            store,
            timezone,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = RwLock::new(Some(Arc::new(catalog)));
        self
    }

    pub fn with_catalog_source(mut self, source: CatalogSource) -> Self {
        self.catalog_source = Some(source);
        self
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// 当前清单快照。
    pub async fn catalog(&self) -> Option<Arc<Catalog>> {
        self.catalog.read().await.clone()
    }

    /// 从配置的来源重新加载清单，成功后整体替换。
    pub async fn reload_catalog(&self) -> Result<CatalogReport, MonitorError> {
        let Some(source) = self.catalog_source.clone() else {
            return Err(MonitorError::CatalogNotConfigured);
        };
        let catalog = tokio::task::spawn_blocking(move || source.load())
            .await
            .map_err(|err| MonitorError::Task(err.to_string()))??;
        let report = catalog.report();
        *self.catalog.write().await = Some(Arc::new(catalog));
        Ok(report)
    }

    /// 全量巡检；清单不可用时返回 `Ok(None)`。
    pub async fn fetch_all(&self) -> Result<Option<FetchResult>, MonitorError> {
        let Some(catalog) = self.available_catalog("fetch_all").await else {
            return Ok(None);
        };
        let result = self.fetch_groups(catalog.groups().clone()).await?;
        Ok(Some(result))
    }

    /// 按区域巡检（区域名忽略大小写）。
    pub async fn fetch_by_region(&self, region: &str) -> Result<Option<FetchResult>, MonitorError> {
        let Some(catalog) = self.available_catalog("fetch_by_region").await else {
            return Ok(None);
        };
        let Some((name, devices)) = catalog.group(region) else {
            return Err(MonitorError::RegionNotFound(region.to_string()));
        };
        let mut groups = BTreeMap::new();
        groups.insert(name.to_string(), devices.to_vec());
        let result = self.fetch_groups(groups).await?;
        Ok(Some(result))
    }

    pub async fn list_all_identifiers(&self) -> Option<Vec<String>> {
        let catalog = self.available_catalog("list_all_identifiers").await?;
        Some(catalog.identifiers())
    }

    /// 区域名及设备数量。
    pub async fn list_regions(&self) -> Option<Vec<(String, usize)>> {
        let catalog = self.available_catalog("list_regions").await?;
        Some(
            catalog
                .groups()
                .iter()
                .map(|(name, devices)| (name.clone(), devices.len()))
                .collect(),
        )
    }

    /// 在清单中查找设备（不探测、不填充历史）。
    pub async fn find_device(&self, identifier: &str) -> Option<DeviceRecord> {
        let catalog = self.catalog().await?;
        catalog.find(identifier).cloned()
    }

    /// 填充设备历史（转换到展示时区，存储内容不变）。
    ///
    /// 没有历史时保持为空并记录 info 日志。
    pub async fn get_history(&self, device: &mut DeviceRecord) -> Result<(), MonitorError> {
        let history = self.stored_history(device).await?;
        device.history = history
            .into_iter()
            .map(|event| StatusEvent::new(event.status, to_timezone(&event.timestamp, &self.timezone)))
            .collect();
        Ok(())
    }

    /// 回放设备历史得到在线/离线时长。
    pub async fn get_replay_stats(&self, device: &DeviceRecord) -> Result<ReplayStats, MonitorError> {
        let history = self.stored_history(device).await?;
        Ok(compute_stats(&history))
    }

    /// 后台巡检一轮，返回汇总。
    pub async fn run_cycle(&self) -> Result<Option<Summary>, MonitorError> {
        Ok(self.fetch_all().await?.map(|result| result.summary))
    }

    async fn available_catalog(&self, operation: &str) -> Option<Arc<Catalog>> {
        let catalog = self.catalog().await;
        if catalog.is_none() {
            warn!(target: "fleet.monitor", operation, "device catalog not loaded");
        }
        catalog
    }

    async fn stored_history(&self, device: &DeviceRecord) -> Result<Vec<StatusEvent>, MonitorError> {
        let identifier = device.identifier.trim();
        if identifier.is_empty() {
            info!(target: "fleet.monitor", "device has no identifier, no history");
            return Ok(Vec::new());
        }
        let history = self.store.history_of(identifier).await?;
        if history.is_empty() {
            info!(target: "fleet.monitor", identifier, "no history recorded");
        }
        Ok(history)
    }

    /// 探测 -> 记录迁移 -> 汇总。所有分组合并为一次探测批次与一次写入。
    ///
    /// 探测与写入在后台任务中执行，调用方被取消时仍会完成。
    async fn fetch_groups(
        &self,
        groups: BTreeMap<String, Vec<DeviceRecord>>,
    ) -> Result<FetchResult, MonitorError> {
        let mut layout = Vec::with_capacity(groups.len());
        let mut devices = Vec::new();
        for (name, group) in groups {
            layout.push((name, group.len()));
            devices.extend(group);
        }

        let prober = self.prober.clone();
        let tracker = self.tracker.clone();
        let devices = tokio::spawn(async move {
            prober.resolve_devices(&mut devices).await;
            tracker.record_batch(&devices).await.map(|_| devices)
        })
        .await
        .map_err(|err| MonitorError::Task(err.to_string()))??;

        let mut remaining = devices.into_iter();
        let details: BTreeMap<String, Vec<DeviceRecord>> = layout
            .into_iter()
            .map(|(name, count)| (name, remaining.by_ref().take(count).collect()))
            .collect();
        let summary = summarize(&details);
        record_fetch_cycle();
        info!(
            target: "fleet.monitor",
            groups = details.len(),
            total = summary.total_devices,
            online = summary.total_online,
            offline = summary.total_offline,
            "fetch completed"
        );
        Ok(FetchResult { summary, details })
    }
}
