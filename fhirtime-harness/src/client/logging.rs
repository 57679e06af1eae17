use super::{ResponseEvent, ResponseObserver};
use fhirtime_core::InvalidObservationError;

/// Logs every exchange at debug level: URL, status, cache directive and latency
#[derive(Debug, Default, Clone, Copy)]
pub struct RequestLogger;

impl ResponseObserver for RequestLogger {
    fn on_response(&self, event: &ResponseEvent) -> Result<(), InvalidObservationError> {
        tracing::debug!(
            method = "GET",
            url = %event.url,
            key = event.key.as_deref().unwrap_or("-"),
            status = event.status,
            cache_control = %event.directive,
            elapsed_ms = event.elapsed_millis,
            "FHIR exchange"
        );
        Ok(())
    }

    fn name(&self) -> &str {
        "request-logger"
    }
}
