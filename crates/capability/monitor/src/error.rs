use fleet_catalog::CatalogError;
use fleet_storage::StorageError;

/// 监控服务错误。
///
/// 数据不可用（清单未加载）不是错误，通过 `Ok(None)` 表达。
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
    #[error("catalog source is not configured")]
    CatalogNotConfigured,
    #[error("region not found: {0}")]
    RegionNotFound(String),
    #[error("background task failed: {0}")]
    Task(String),
}
