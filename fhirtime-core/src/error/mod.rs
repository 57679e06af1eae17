//! Core error types for fhirtime

pub mod transport;

use thiserror::Error;
pub use transport::TransportError;

/// Main error type for fhirtime operations
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Invalid observation: {0}")]
    InvalidObservation(#[from] InvalidObservationError),

    #[error("Malformed response: {0}")]
    MalformedResponse(#[from] MalformedResponseError),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for fhirtime operations
pub type BenchResult<T> = Result<T, BenchError>;

/// A latency value that cannot be folded into a batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidObservationError {
    #[error("negative latency of {0} ms")]
    Negative(i64),
}

/// A returned record does not have the shape the print path relies on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedResponseError {
    #[error("record {record} has a matching name without a given name")]
    MissingGivenName { record: String },
}
