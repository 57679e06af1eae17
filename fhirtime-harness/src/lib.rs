//! Response-time and cache-behaviour measurement harness for FHIR patient search.
//!
//! The [`bench::BenchmarkDriver`] issues repeated searches through a
//! [`client::SearchTransport`]. Every HTTP exchange the transport completes is
//! reported to its registered [`client::ResponseObserver`]s, one of which is
//! the [`timer::ResponseTimer`] that turns raw latencies into batch averages.

pub mod bench;
pub mod client;
pub mod search;
pub mod timer;

pub use bench::{BenchmarkDriver, LoopOutcome, NameSource, RunSummary};
pub use client::{
    CacheControlPolicy, FhirClient, ObserverChain, RequestLogger, ResponseEvent, ResponseObserver,
    SearchTransport,
};
pub use search::{render_record, sort_by_given_name, PatientSearch};
pub use timer::{CollectingSink, ReportSink, ResponseTimer, TimerPhase};

pub use fhirtime_core::{
    BatchReport, BenchError, BenchResult, CacheDirective, HumanName, InvalidObservationError,
    MalformedResponseError, PersonRecord, TransportError,
};
