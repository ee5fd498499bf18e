//! TCP 连接探测（无 ICMP 权限时使用）。

use crate::error::ProbeError;
use crate::Probe;
use async_trait::async_trait;
use domain::Reachability;
use std::io::ErrorKind;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;

/// 在超时内建立连接或被对端拒绝都视为主机在线。
///
/// 标识可以带端口（`host:port`），否则使用默认端口。
#[derive(Debug, Clone)]
pub struct TcpProbe {
    port: u16,
    timeout: Duration,
}

impl TcpProbe {
    pub fn new(port: u16, timeout: Duration) -> Self {
        Self { port, timeout }
    }
}

#[async_trait]
impl Probe for TcpProbe {
    async fn probe(&self, identifier: &str) -> Result<Reachability, ProbeError> {
        let (host, port) = split_target(identifier.trim(), self.port)?;
        let connect = TcpStream::connect((host.as_str(), port));
        let status = match tokio::time::timeout(self.timeout, connect).await {
            Ok(Ok(_stream)) => Reachability::Online,
            Ok(Err(err)) if err.kind() == ErrorKind::ConnectionRefused => Reachability::Online,
            Ok(Err(_)) | Err(_) => Reachability::Offline,
        };
        Ok(status)
    }
}

pub(crate) fn split_target(identifier: &str, default_port: u16) -> Result<(String, u16), ProbeError> {
    if identifier.is_empty() {
        return Err(ProbeError::InvalidTarget(identifier.to_string()));
    }
    if let Ok(addr) = identifier.parse::<SocketAddr>() {
        return Ok((addr.ip().to_string(), addr.port()));
    }
    if let Ok(ip) = identifier.parse::<IpAddr>() {
        return Ok((ip.to_string(), default_port));
    }
    match identifier.rsplit_once(':') {
        Some((host, port)) if !host.is_empty() => {
            let port = port
                .parse::<u16>()
                .map_err(|_| ProbeError::InvalidTarget(identifier.to_string()))?;
            Ok((host.to_string(), port))
        }
        Some(_) => Err(ProbeError::InvalidTarget(identifier.to_string())),
        None => Ok((identifier.to_string(), default_port)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_target_variants() {
        assert_eq!(split_target("10.0.0.1", 80).unwrap(), ("10.0.0.1".to_string(), 80));
        assert_eq!(split_target("10.0.0.1:22", 80).unwrap(), ("10.0.0.1".to_string(), 22));
        assert_eq!(split_target("gw.local:8443", 80).unwrap(), ("gw.local".to_string(), 8443));
        assert_eq!(split_target("gw.local", 80).unwrap(), ("gw.local".to_string(), 80));
        assert_eq!(split_target("::1", 80).unwrap(), ("::1".to_string(), 80));
        assert_eq!(split_target("[::1]:22", 80).unwrap(), ("::1".to_string(), 22));
        assert!(split_target("gw.local:http", 80).is_err());
        assert!(split_target(":22", 80).is_err());
    }
}
