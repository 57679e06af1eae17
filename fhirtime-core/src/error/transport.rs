use thiserror::Error;

/// Failure of a single remote search call.
///
/// A transport error only ever aborts the call that produced it; the
/// benchmark driver logs it and moves on to the next name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("could not reach {0}")]
    Connect(String),

    #[error("request to {0} timed out")]
    Timeout(String),

    #[error("server answered {status} for {url}")]
    Status { status: u16, url: String },

    #[error("unexpected response body: {0}")]
    Malformed(String),

    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Whether the remote endpoint produced an HTTP response at all
    pub fn has_response(&self) -> bool {
        matches!(self, TransportError::Status { .. } | TransportError::Malformed(_))
    }
}
