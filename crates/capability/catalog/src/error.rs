use std::path::PathBuf;

/// 清单加载错误。
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid json catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid csv catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid catalog layout: {0}")]
    Layout(String),
    #[error("unsupported catalog source: {0}")]
    Unsupported(PathBuf),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
