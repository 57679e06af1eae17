//! Benchmark orchestration: the name feed and the loop driver

pub mod driver;
pub mod names;

pub use driver::{BenchmarkDriver, LoopOutcome, RunSummary};
pub use names::NameSource;
