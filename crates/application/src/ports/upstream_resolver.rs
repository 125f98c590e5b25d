use async_trait::async_trait;
use bytes::Bytes;
use doh_ecs_domain::{DohMethod, DomainError};

/// An upstream HTTP answer, relayed to the caller as received.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl UpstreamResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait UpstreamResolver: Send + Sync {
    /// Sends an `application/dns-message` query with the given method.
    async fn send_message(
        &self,
        message: &[u8],
        method: DohMethod,
    ) -> Result<UpstreamResponse, DomainError>;

    /// Sends an `application/dns-json` query built from ordered pairs.
    async fn send_json(&self, params: &[(String, String)]) -> Result<UpstreamResponse, DomainError>;
}
