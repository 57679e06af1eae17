use crate::client::{CacheControlPolicy, SearchTransport};
use fhirtime_core::{BenchError, BenchResult};
use indicatif::ProgressBar;
use std::time::Duration;

/// Default pause between loops
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(10);

/// Calls made during one pass over the name list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopOutcome {
    pub index: usize,
    pub cache_disabled: bool,
    pub succeeded: usize,
    pub failed: usize,
}

impl LoopOutcome {
    pub fn calls(&self) -> usize {
        self.succeeded + self.failed
    }
}

/// What a benchmark run did, loop by loop
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub loops: Vec<LoopOutcome>,
}

impl RunSummary {
    pub fn total_calls(&self) -> usize {
        self.loops.iter().map(LoopOutcome::calls).sum()
    }

    pub fn total_failures(&self) -> usize {
        self.loops.iter().map(|l| l.failed).sum()
    }
}

/// Runs repeated searches over a name list.
///
/// Every loop but the last allows caching; the last forces fresh results so
/// its batch average is the uncached baseline. Between loops the driver
/// sleeps so that caches warmed by one loop do not leak into the next.
pub struct BenchmarkDriver<T> {
    transport: T,
    policy: CacheControlPolicy,
    settle_delay: Duration,
    progress: ProgressBar,
}

impl<T: SearchTransport> BenchmarkDriver<T> {
    pub fn new(transport: T, policy: CacheControlPolicy) -> Self {
        Self {
            transport,
            policy,
            settle_delay: DEFAULT_SETTLE_DELAY,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Report progress on `bar`; its length is set when a run starts
    pub fn with_progress(mut self, bar: ProgressBar) -> Self {
        self.progress = bar;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Search `names[..name_count]` once per loop, `loop_count` times.
    ///
    /// A failed search is logged and counted; it never ends the run.
    pub fn run<S: AsRef<str>>(
        &self,
        loop_count: usize,
        name_count: usize,
        names: &[S],
    ) -> BenchResult<RunSummary> {
        if loop_count == 0 || name_count == 0 {
            return Err(BenchError::Configuration(format!(
                "loop count and name count must be positive (got {} and {})",
                loop_count, name_count
            )));
        }
        if name_count > names.len() {
            return Err(BenchError::Configuration(format!(
                "{} names requested but only {} supplied",
                name_count,
                names.len()
            )));
        }

        self.progress
            .set_length(loop_count.saturating_mul(name_count) as u64);
        let mut summary = RunSummary::default();

        for index in 0..loop_count {
            let cache_disabled = index == loop_count - 1;
            let mut outcome = LoopOutcome {
                index,
                cache_disabled,
                succeeded: 0,
                failed: 0,
            };
            tracing::info!(loop_index = index, cache_disabled, "starting loop");
            self.progress
                .set_message(format!("loop {}/{}", index + 1, loop_count));

            for name in &names[..name_count] {
                let name = name.as_ref();
                let directive = self.policy.build(cache_disabled);

                match self.transport.search(name, &directive) {
                    Ok(records) => {
                        outcome.succeeded += 1;
                        tracing::debug!(name, matches = records.len(), "search complete");
                    }
                    Err(e) => {
                        outcome.failed += 1;
                        tracing::warn!(
                            name,
                            answered = e.has_response(),
                            error = %e,
                            "search failed, continuing with next name"
                        );
                    }
                }
                self.progress.inc(1);
            }

            summary.loops.push(outcome);

            if index < loop_count - 1 && !self.settle_delay.is_zero() {
                tracing::debug!(
                    delay_secs = self.settle_delay.as_secs_f64(),
                    "letting caches settle"
                );
                self.progress.set_message("waiting for caches to settle");
                std::thread::sleep(self.settle_delay);
            }
        }

        self.progress.finish_and_clear();
        Ok(summary)
    }
}
