use fhirtime_core::BatchReport;
use parking_lot::Mutex;

/// Destination for closed-batch reports.
///
/// The timer itself keeps no history; a sink that needs one keeps it. Sinks
/// run after the timer has released its lock, so they may query it.
pub trait ReportSink: Send + Sync {
    fn emit(&self, report: &BatchReport);
}

impl<F> ReportSink for F
where
    F: Fn(&BatchReport) + Send + Sync,
{
    fn emit(&self, report: &BatchReport) {
        self(report)
    }
}

/// Keeps every report in arrival order
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<BatchReport>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the reports collected so far
    pub fn reports(&self) -> Vec<BatchReport> {
        self.reports.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }
}

impl ReportSink for CollectingSink {
    fn emit(&self, report: &BatchReport) {
        self.reports.lock().push(report.clone());
    }
}
