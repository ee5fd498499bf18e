//! 清单来源：JSON 文件、CSV 文件或 CSV 目录（每个文件一个区域）。

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::normalize::{CatalogRow, normalize_row};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    /// `{ "<region>": [ { "<column>": <scalar> } ] }`
    JsonFile(PathBuf),
    /// 单个 CSV，分组名取文件名（不含扩展名）。
    CsvFile(PathBuf),
    /// 目录下每个 `.csv` 文件为一个分组。
    CsvDir(PathBuf),
}

impl CatalogSource {
    /// 根据路径判断来源类型。
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        let path = path.into();
        if path.is_dir() {
            return Ok(Self::CsvDir(path));
        }
        match extension_of(&path).as_deref() {
            Some("json") => Ok(Self::JsonFile(path)),
            Some("csv") => Ok(Self::CsvFile(path)),
            _ => Err(CatalogError::Unsupported(path)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::JsonFile(path) | Self::CsvFile(path) | Self::CsvDir(path) => path,
        }
    }

    /// 同步读取并构建清单（调用方在异步上下文中应放到阻塞线程执行）。
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let rows = match self {
            Self::JsonFile(path) => read_json(path)?,
            Self::CsvFile(path) => {
                let mut rows = BTreeMap::new();
                rows.insert(group_name(path), read_csv(path)?);
                rows
            }
            Self::CsvDir(dir) => read_csv_dir(dir)?,
        };
        let catalog = Catalog::from_rows(rows);
        let report = catalog.report();
        info!(
            target: "fleet.catalog",
            source = %self.path().display(),
            regions = report.regions,
            devices = report.devices,
            missing_identifier = report.missing_identifier,
            "catalog loaded"
        );
        Ok(catalog)
    }
}

fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn group_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().trim().to_string())
        .unwrap_or_default()
}

fn read_json(path: &Path) -> Result<BTreeMap<String, Vec<CatalogRow>>, CatalogError> {
    let raw = fs::read_to_string(path).map_err(|err| CatalogError::io(path, err))?;
    let root: Value = serde_json::from_str(&raw)?;
    let Value::Object(groups) = root else {
        return Err(CatalogError::Layout(
            "json catalog root must be an object of region -> rows".to_string(),
        ));
    };

    let mut rows = BTreeMap::new();
    for (group, items) in groups {
        let Value::Array(items) = items else {
            return Err(CatalogError::Layout(format!(
                "region {group} must hold an array of rows"
            )));
        };
        let mut group_rows = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(fields) = item else {
                warn!(target: "fleet.catalog", group = %group, row = index + 1, "non-object catalog row skipped");
                continue;
            };
            let fields = fields
                .into_iter()
                .filter_map(|(key, value)| scalar_to_string(value).map(|value| (key, value)));
            group_rows.push(normalize_row(fields));
        }
        rows.insert(group, group_rows);
    }
    Ok(rows)
}

fn scalar_to_string(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(value) => Some(value),
        Value::Bool(value) => Some(value.to_string()),
        Value::Number(value) => Some(value.to_string()),
        other => Some(other.to_string()),
    }
}

fn read_csv(path: &Path) -> Result<Vec<CatalogRow>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|value| value.trim().is_empty()) {
            continue;
        }
        rows.push(normalize_row(headers.iter().zip(record.iter())));
    }
    Ok(rows)
}

fn read_csv_dir(dir: &Path) -> Result<BTreeMap<String, Vec<CatalogRow>>, CatalogError> {
    let entries = fs::read_dir(dir).map_err(|err| CatalogError::io(dir, err))?;
    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|err| CatalogError::io(dir, err))?.path();
        if path.is_file() && extension_of(&path).as_deref() == Some("csv") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut rows = BTreeMap::new();
    for path in paths {
        rows.insert(group_name(&path), read_csv(&path)?);
    }
    Ok(rows)
}
