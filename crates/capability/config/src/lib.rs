//! 应用运行配置加载。

use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// 配置加载错误。
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    Invalid(String, String),
}

/// 可达性探测方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeMode {
    /// 调用系统 ping 发送一次 ICMP echo。
    Icmp,
    /// 尝试建立 TCP 连接。
    Tcp,
}

/// 状态历史存储后端。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryBackend {
    File,
    Memory,
}

/// 应用运行配置。
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http_addr: String,
    pub catalog_path: Option<PathBuf>,
    pub history_backend: HistoryBackend,
    pub history_path: PathBuf,
    pub retention_days: u64,
    pub probe_mode: ProbeMode,
    pub probe_fan_out: usize,
    pub probe_timeout_ms: u64,
    pub probe_tcp_port: u16,
    pub timezone: Tz,
    pub poll_interval_seconds: Option<u64>,
}

impl AppConfig {
    /// 从环境变量读取配置。
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// 从任意键值来源读取配置（测试时传入 HashMap）。
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let http_addr =
            read_optional(&lookup, "FLEET_HTTP_ADDR").unwrap_or_else(|| "127.0.0.1:8080".to_string());
        let catalog_path = read_optional(&lookup, "FLEET_CATALOG_PATH").map(PathBuf::from);
        let history_backend = match read_optional(&lookup, "FLEET_HISTORY_BACKEND") {
            None => HistoryBackend::File,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "file" => HistoryBackend::File,
                "memory" => HistoryBackend::Memory,
                _ => return Err(ConfigError::Invalid("FLEET_HISTORY_BACKEND".to_string(), value)),
            },
        };
        let history_path = read_optional(&lookup, "FLEET_HISTORY_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("data/status_history.json"));
        let retention_days = read_u64_with_default(&lookup, "FLEET_RETENTION_DAYS", 30)?;
        if retention_days == 0 {
            return Err(ConfigError::Invalid(
                "FLEET_RETENTION_DAYS".to_string(),
                "0".to_string(),
            ));
        }
        let probe_mode = match read_optional(&lookup, "FLEET_PROBE_MODE") {
            None => ProbeMode::Icmp,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "icmp" | "ping" => ProbeMode::Icmp,
                "tcp" => ProbeMode::Tcp,
                _ => return Err(ConfigError::Invalid("FLEET_PROBE_MODE".to_string(), value)),
            },
        };
        let probe_fan_out = read_u64_with_default(&lookup, "FLEET_PROBE_FAN_OUT", 10)?.max(1) as usize;
        let probe_timeout_ms = read_u64_with_default(&lookup, "FLEET_PROBE_TIMEOUT_MS", 1000)?;
        let probe_tcp_port = read_u16_with_default(&lookup, "FLEET_PROBE_TCP_PORT", 80)?;
        let timezone = match read_optional(&lookup, "FLEET_TIMEZONE") {
            None => chrono_tz::UTC,
            Some(value) => value
                .parse::<Tz>()
                .map_err(|_| ConfigError::Invalid("FLEET_TIMEZONE".to_string(), value))?,
        };
        let poll_interval_seconds =
            read_optional_u64(&lookup, "FLEET_POLL_INTERVAL_SECONDS")?.filter(|value| *value > 0);

        Ok(Self {
            http_addr,
            catalog_path,
            history_backend,
            history_path,
            retention_days,
            probe_mode,
            probe_fan_out,
            probe_timeout_ms,
            probe_tcp_port,
            timezone,
            poll_interval_seconds,
        })
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_seconds.map(Duration::from_secs)
    }
}

fn read_u16_with_default<F>(lookup: &F, key: &str, default: u16) -> Result<u16, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match read_optional(lookup, key) {
        Some(value) => value,
        None => return Ok(default),
    };
    value
        .parse::<u16>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_u64_with_default<F>(lookup: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = match read_optional(lookup, key) {
        Some(value) => value,
        None => return Ok(default),
    };
    value
        .parse::<u64>()
        .map_err(|_| ConfigError::Invalid(key.to_string(), value))
}

fn read_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Some(value.trim().to_string()),
        _ => None,
    }
}

fn read_optional_u64<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match read_optional(lookup, key) {
        None => Ok(None),
        Some(value) => value
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key.to_string(), value)),
    }
}
