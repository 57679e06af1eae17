//! Response timing and batch averaging.
//!
//! The first response a timer sees is connection set-up (the client's
//! handshake with the server), not a search, and never enters batch math.
//! Every later response is folded into a running total; after each
//! `batch_size` observations the batch average is reported and the total
//! reset.

pub mod sink;

use crate::client::{ResponseEvent, ResponseObserver};
use fhirtime_core::{
    BatchReport, BenchError, BenchResult, InvalidObservationError, LatencyObservation,
};
use parking_lot::Mutex;
use std::sync::Arc;

pub use sink::{CollectingSink, ReportSink};

/// Lifecycle of a timer; the handshake transition happens once and is final
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPhase {
    AwaitingHandshake,
    Accumulating,
}

#[derive(Debug)]
struct TimerState {
    phase: TimerPhase,
    running_total_millis: u64,
    /// Steady-state observations since the handshake
    observations: u64,
    batches_emitted: u64,
}

/// Observer measuring response latency in fixed-size batches.
///
/// All state lives behind a single lock so that closing a batch (check the
/// counter, build the report, reset) is atomic even when the timer is shared.
/// Sinks are called after the lock is released and may query the timer; with
/// several threads closing batches at once, reports can reach sinks out of
/// batch order.
pub struct ResponseTimer {
    batch_size: usize,
    state: Mutex<TimerState>,
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl ResponseTimer {
    pub fn new(batch_size: usize) -> BenchResult<Self> {
        if batch_size == 0 {
            return Err(BenchError::Configuration(
                "batch size must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            batch_size,
            state: Mutex::new(TimerState {
                phase: TimerPhase::AwaitingHandshake,
                running_total_millis: 0,
                observations: 0,
                batches_emitted: 0,
            }),
            sinks: Vec::new(),
        })
    }

    /// Also deliver batch reports to `sink`
    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.lock().phase
    }

    /// Steady-state observations folded so far (handshake excluded)
    pub fn observations(&self) -> u64 {
        self.state.lock().observations
    }

    pub fn batches_emitted(&self) -> u64 {
        self.state.lock().batches_emitted
    }

    /// Record one response latency.
    ///
    /// Returns the report of the batch this observation closed, if any. A
    /// negative latency is rejected and leaves the timer untouched.
    pub fn on_response(
        &self,
        elapsed_millis: i64,
    ) -> Result<Option<BatchReport>, InvalidObservationError> {
        let elapsed_millis = u64::try_from(elapsed_millis)
            .map_err(|_| InvalidObservationError::Negative(elapsed_millis))?;

        tracing::info!("response time for query: {} ms", elapsed_millis);

        let mut state = self.state.lock();
        if state.phase == TimerPhase::AwaitingHandshake {
            state.phase = TimerPhase::Accumulating;
            tracing::debug!(
                elapsed_ms = elapsed_millis,
                "handshake response excluded from batches"
            );
            return Ok(None);
        }

        let observation = LatencyObservation {
            sequence_index: state.observations,
            elapsed_millis,
        };
        state.running_total_millis = state
            .running_total_millis
            .saturating_add(observation.elapsed_millis);
        state.observations += 1;

        if state.observations % self.batch_size as u64 != 0 {
            return Ok(None);
        }

        let report = BatchReport::new(
            state.observations / self.batch_size as u64,
            state.running_total_millis,
            self.batch_size,
        );
        state.running_total_millis = 0;
        state.batches_emitted += 1;
        drop(state);

        tracing::info!("-------------------------");
        tracing::info!(
            batch_index = report.batch_index,
            average_ms = report.average_millis,
            "batch {}: average time: {} ms",
            report.batch_index,
            report.average_millis
        );
        tracing::info!("-------------------------");

        for sink in &self.sinks {
            sink.emit(&report);
        }

        Ok(Some(report))
    }
}

impl ResponseObserver for ResponseTimer {
    fn on_response(&self, event: &ResponseEvent) -> Result<(), InvalidObservationError> {
        ResponseTimer::on_response(self, event.elapsed_millis).map(|_| ())
    }

    fn name(&self) -> &str {
        "response-timer"
    }
}

impl std::fmt::Debug for ResponseTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseTimer")
            .field("batch_size", &self.batch_size)
            .field("state", &*self.state.lock())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}
