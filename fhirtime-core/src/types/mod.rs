//! Shared data types for the fhirtime harness

pub mod cache;
pub mod observation;
pub mod patient;

pub use cache::CacheDirective;
pub use observation::{BatchReport, LatencyObservation};
pub use patient::{HumanName, PersonRecord};
