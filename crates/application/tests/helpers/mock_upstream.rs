use async_trait::async_trait;
use bytes::Bytes;
use doh_ecs_application::ports::{UpstreamResolver, UpstreamResponse};
use doh_ecs_domain::{DohMethod, DomainError};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub enum SentRequest {
    Message { body: Vec<u8>, method: DohMethod },
    Json { params: Vec<(String, String)> },
}

pub struct MockUpstreamResolver {
    sent: Mutex<Vec<SentRequest>>,
    response: Mutex<Result<UpstreamResponse, DomainError>>,
}

impl MockUpstreamResolver {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            response: Mutex::new(Ok(UpstreamResponse::new(
                200,
                vec![(
                    "content-type".to_string(),
                    "application/dns-message".to_string(),
                )],
                Bytes::from_static(b"answer"),
            ))),
        }
    }

    pub fn set_response(&self, response: UpstreamResponse) {
        *self.response.lock().unwrap() = Ok(response);
    }

    pub fn set_error(&self, error: DomainError) {
        *self.response.lock().unwrap() = Err(error);
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn record(&self, request: SentRequest) -> Result<UpstreamResponse, DomainError> {
        self.sent.lock().unwrap().push(request);
        self.response.lock().unwrap().clone()
    }
}

impl Default for MockUpstreamResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamResolver for MockUpstreamResolver {
    async fn send_message(
        &self,
        message: &[u8],
        method: DohMethod,
    ) -> Result<UpstreamResponse, DomainError> {
        self.record(SentRequest::Message {
            body: message.to_vec(),
            method,
        })
    }

    async fn send_json(&self, params: &[(String, String)]) -> Result<UpstreamResponse, DomainError> {
        self.record(SentRequest::Json {
            params: params.to_vec(),
        })
    }
}
