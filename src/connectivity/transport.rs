use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;

/// Network primitives the connectivity probe is built on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open (and immediately drop) a TCP connection to `addr` ("host:port")
    async fn connect(&self, addr: &str, timeout: Duration) -> Result<()>;

    /// Issue a GET and return the HTTP status code
    async fn http_get(&self, url: &str, timeout: Duration) -> Result<u16>;
}

/// Real sockets and HTTP via tokio + reqwest
#[derive(Debug, Clone, Default)]
pub struct NetTransport {
    client: reqwest::Client,
}

impl NetTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Transport for NetTransport {
    async fn connect(&self, addr: &str, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => anyhow::bail!("connect to {} timed out after {:?}", addr, timeout),
        }
    }

    async fn http_get(&self, url: &str, timeout: Duration) -> Result<u16> {
        let response = self.client.get(url).timeout(timeout).send().await?;
        Ok(response.status().as_u16())
    }
}
