use thiserror::Error;

/// Failures of the wire-format codec. Every variant is terminal for the
/// request that produced it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Malformed DNS message: {0}")]
    MalformedMessage(String),

    #[error("DNS message exceeds protocol limits: {0}")]
    EncodingOverflow(String),

    #[error("Unsupported EDNS option code {0}")]
    UnsupportedOption(u16),
}

impl CodecError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMessage(msg.into())
    }

    pub(crate) fn overflow(msg: impl Into<String>) -> Self {
        Self::EncodingOverflow(msg.into())
    }
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Invalid DoH query: {0}")]
    InvalidQuery(String),

    #[error("Timeout waiting for upstream {url}")]
    UpstreamTimeout { url: String },

    #[error("Upstream {url} unavailable: {reason}")]
    UpstreamUnavailable { url: String, reason: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    /// Errors caused by the caller's input rather than by the upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::Codec(_) | DomainError::InvalidQuery(_))
    }
}
