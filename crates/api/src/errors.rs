use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use doh_ecs_domain::DomainError;
use tracing::warn;

pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            DomainError::Codec(_) | DomainError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                format!("DNS message modification failed: {}", self.0),
            ),

            DomainError::UpstreamUnavailable { .. } => (StatusCode::BAD_GATEWAY, self.0.to_string()),

            DomainError::UpstreamTimeout { .. } => {
                (StatusCode::GATEWAY_TIMEOUT, self.0.to_string())
            }

            DomainError::ConfigError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal error".to_string(),
            ),
        };

        warn!(status = status.as_u16(), error = %self.0, "DoH request failed");
        (status, message).into_response()
    }
}
