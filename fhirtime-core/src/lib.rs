//! Core utilities and types shared across all fhirtime crates

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{
    BenchError, BenchResult, InvalidObservationError, MalformedResponseError, TransportError,
};
pub use config::{
    load_config, resolve_base_url, save_config, BenchmarkConfig, CacheConfig, Config, Properties,
    ServerConfig, BASE_URL_KEY,
};

pub use types::{
    BatchReport, CacheDirective, HumanName, LatencyObservation, PersonRecord,
};

/// Version information for the fhirtime project
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
