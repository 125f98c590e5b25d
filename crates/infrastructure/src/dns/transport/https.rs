//! DNS-over-HTTPS upstream (RFC 8484)
//!
//! Queries leave either as GET with the message in the `dns` parameter or
//! as POST with the raw message as body. JSON queries go to a separate
//! endpoint with their query string rebuilt from the ordered pairs.
//!
//! ```text
//! GET /dns-query?dns=<base64url> HTTP/1.1
//! Accept: application/dns-message
//!
//! POST /dns-query HTTP/1.1
//! Content-Type: application/dns-message
//! Accept: application/dns-message
//!
//! <raw DNS message bytes>
//! ```

use async_trait::async_trait;
use doh_ecs_application::ports::{UpstreamResolver, UpstreamResponse};
use doh_ecs_domain::config::UpstreamConfig;
use doh_ecs_domain::{encode_base64url, DohMethod, DomainError};
use std::time::Duration;
use tracing::debug;

pub const DNS_MESSAGE_CONTENT_TYPE: &str = "application/dns-message";
pub const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

/// DoH upstream sharing one pooled `reqwest::Client`.
pub struct HttpsUpstream {
    client: reqwest::Client,
    url: String,
    json_url: String,
    timeout: Duration,
}

impl HttpsUpstream {
    pub fn new(url: String, json_url: String, timeout: Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()
            .map_err(|e| DomainError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url,
            json_url,
            timeout,
        })
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, DomainError> {
        Self::new(config.url.clone(), config.json_url.clone(), config.timeout())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn json_url(&self) -> &str {
        &self.json_url
    }

    async fn execute(
        &self,
        url: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<UpstreamResponse, DomainError> {
        let response = tokio::time::timeout(self.timeout, request.send())
            .await
            .map_err(|_| timeout_error(url))?
            .map_err(|e| request_error(url, e))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = tokio::time::timeout(self.timeout, response.bytes())
            .await
            .map_err(|_| timeout_error(url))?
            .map_err(|e| request_error(url, e))?;

        debug!(
            url = %url,
            status = status,
            response_len = body.len(),
            "DoH response received"
        );

        Ok(UpstreamResponse::new(status, headers, body))
    }
}

#[async_trait]
impl UpstreamResolver for HttpsUpstream {
    async fn send_message(
        &self,
        message: &[u8],
        method: DohMethod,
    ) -> Result<UpstreamResponse, DomainError> {
        debug!(
            url = %self.url,
            method = %method,
            message_len = message.len(),
            "Sending DoH query"
        );

        let request = match method {
            DohMethod::Get => self
                .client
                .get(&self.url)
                .query(&[("dns", encode_base64url(message))])
                .header("Accept", DNS_MESSAGE_CONTENT_TYPE),
            DohMethod::Post => self
                .client
                .post(&self.url)
                .header("Content-Type", DNS_MESSAGE_CONTENT_TYPE)
                .header("Accept", DNS_MESSAGE_CONTENT_TYPE)
                .body(message.to_vec()),
        };

        self.execute(&self.url, request).await
    }

    async fn send_json(&self, params: &[(String, String)]) -> Result<UpstreamResponse, DomainError> {
        debug!(url = %self.json_url, params = params.len(), "Sending DoH JSON query");

        let request = self
            .client
            .get(&self.json_url)
            .query(params)
            .header("Accept", DNS_JSON_CONTENT_TYPE);

        self.execute(&self.json_url, request).await
    }
}

fn timeout_error(url: &str) -> DomainError {
    DomainError::UpstreamTimeout {
        url: url.to_string(),
    }
}

fn request_error(url: &str, e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        timeout_error(url)
    } else {
        DomainError::UpstreamUnavailable {
            url: url.to_string(),
            reason: e.to_string(),
        }
    }
}
