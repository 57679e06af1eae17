//! Search transport seam and response observers.
//!
//! A transport executes one remote search per call and reports every HTTP
//! exchange it completes to the observers registered with it, synchronously
//! and in registration order, before the call returns.

pub mod cache;
pub mod fhir;
pub mod logging;

use fhirtime_core::{CacheDirective, InvalidObservationError, PersonRecord, TransportError};
use std::sync::Arc;

pub use cache::CacheControlPolicy;
pub use fhir::FhirClient;
pub use logging::RequestLogger;

/// Executes one parameterised remote search
#[cfg_attr(test, mockall::automock)]
pub trait SearchTransport {
    /// Search for records whose family name equals `key`.
    ///
    /// No retries: a failure is returned to the caller immediately.
    fn search(
        &self,
        key: &str,
        directive: &CacheDirective,
    ) -> Result<Vec<PersonRecord>, TransportError>;
}

impl<T: SearchTransport + ?Sized> SearchTransport for &T {
    fn search(
        &self,
        key: &str,
        directive: &CacheDirective,
    ) -> Result<Vec<PersonRecord>, TransportError> {
        (**self).search(key, directive)
    }
}

impl<T: SearchTransport + ?Sized> SearchTransport for Box<T> {
    fn search(
        &self,
        key: &str,
        directive: &CacheDirective,
    ) -> Result<Vec<PersonRecord>, TransportError> {
        (**self).search(key, directive)
    }
}

/// A completed HTTP exchange as seen by observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEvent {
    pub url: String,
    /// Search key, `None` for the capability-statement handshake
    pub key: Option<String>,
    pub status: u16,
    /// Latency reported by the transport
    pub elapsed_millis: i64,
    pub directive: CacheDirective,
}

impl ResponseEvent {
    /// Bare event carrying only a latency
    pub fn with_latency(elapsed_millis: i64) -> Self {
        Self {
            url: String::new(),
            key: None,
            status: 200,
            elapsed_millis,
            directive: CacheDirective::allow(),
        }
    }
}

/// Receives every response a transport observes
pub trait ResponseObserver: Send + Sync {
    fn on_response(&self, event: &ResponseEvent) -> Result<(), InvalidObservationError>;

    /// Name used when logging observer failures
    fn name(&self) -> &str {
        "observer"
    }
}

/// Ordered list of observers notified synchronously.
///
/// Observer failures are logged and swallowed; they never reach the caller
/// of the transport.
#[derive(Default, Clone)]
pub struct ObserverChain {
    observers: Vec<Arc<dyn ResponseObserver>>,
}

impl ObserverChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, observer: Arc<dyn ResponseObserver>) {
        self.observers.push(observer);
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn notify(&self, event: &ResponseEvent) {
        for observer in &self.observers {
            if let Err(e) = observer.on_response(event) {
                tracing::warn!(
                    observer = observer.name(),
                    url = %event.url,
                    error = %e,
                    "discarding response observation"
                );
            }
        }
    }
}

impl std::fmt::Debug for ObserverChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.observers.iter().map(|o| o.name()))
            .finish()
    }
}
