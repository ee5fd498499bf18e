/// 探测错误（调用方统一按离线处理）。
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("invalid probe target: {0}")]
    InvalidTarget(String),
    #[error("failed to spawn ping: {0}")]
    Spawn(#[source] std::io::Error),
}
