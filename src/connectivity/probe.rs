use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::transport::{NetTransport, Transport};
use crate::app::Config;
use crate::utils::log_info;

/// Anything that can answer "is the network up right now?"
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Reachability: Send + Sync {
    async fn is_reachable(&self) -> bool;
}

/// Two-stage reachability check: a raw TCP connect to a public DNS resolver,
/// then HTTP GETs against a fixed list of endpoints. Attempts run strictly in
/// sequence and stop at the first success, so the worst case is
/// `timeout * (1 + endpoints)`.
///
/// Failures are evidence, not faults: nothing here returns an error.
pub struct ConnectivityProbe<T: Transport = NetTransport> {
    transport: T,
    dns_target: String,
    http_endpoints: Vec<String>,
    timeout: Duration,
}

impl ConnectivityProbe<NetTransport> {
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            NetTransport::new(),
            config.probe.dns_target.clone(),
            config.probe.http_endpoints.clone(),
            config.probe.timeout(),
        )
    }
}

impl<T: Transport> ConnectivityProbe<T> {
    pub fn new(
        transport: T,
        dns_target: String,
        http_endpoints: Vec<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            dns_target,
            http_endpoints,
            timeout,
        }
    }

    /// Run the probe with an explicit per-attempt timeout
    pub async fn check(&self, timeout: Duration) -> bool {
        match self.transport.connect(&self.dns_target, timeout).await {
            Ok(()) => {
                log_info(
                    "[INTERNET]",
                    format!("Connected (DNS test passed: {})", self.dns_target),
                );
                return true;
            }
            Err(e) => debug!("DNS connect to {} failed: {}", self.dns_target, e),
        }

        for url in &self.http_endpoints {
            match self.transport.http_get(url, timeout).await {
                Ok(status) if (200..300).contains(&status) => {
                    log_info("[INTERNET]", format!("Connected (HTTP test passed: {})", url));
                    return true;
                }
                Ok(status) => debug!("HTTP probe {} returned {}", url, status),
                Err(e) => debug!("HTTP probe {} failed: {}", url, e),
            }
        }

        log_info("[INTERNET]", "No connection detected");
        false
    }
}

#[async_trait]
impl<T: Transport> Reachability for ConnectivityProbe<T> {
    async fn is_reachable(&self) -> bool {
        self.check(self.timeout).await
    }
}
