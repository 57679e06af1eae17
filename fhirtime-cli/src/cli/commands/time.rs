use crate::cli::commands::Session;
use crate::cli::output::*;
use anyhow::Result;
use clap::Args;
use comfy_table::Cell;
use fhirtime_harness::{
    BatchReport, BenchmarkDriver, CacheControlPolicy, CollectingSink, NameSource, ResponseTimer,
    RunSummary,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Args)]
pub struct TimeArgs {
    /// Passes over the name list; only the last one bypasses server caches
    #[arg(short, long, value_name = "N")]
    pub loops: Option<usize>,

    /// Names searched per pass, taken from the top of the list
    #[arg(short, long, value_name = "N")]
    pub names: Option<usize>,

    /// Newline-delimited list of family names
    #[arg(long, value_name = "FILE")]
    pub names_file: Option<PathBuf>,

    /// Pause between passes so server caches can settle
    #[arg(long, value_name = "SECONDS")]
    pub settle_secs: Option<u64>,
}

pub fn run(args: TimeArgs, session: &Session) -> Result<()> {
    let settings = &session.config.benchmark;
    let loop_count = args.loops.unwrap_or(settings.loop_count);
    let name_count = args.names.unwrap_or(settings.name_count);
    let names_file = args
        .names_file
        .unwrap_or_else(|| PathBuf::from(&settings.names_file));
    let settle = Duration::from_secs(args.settle_secs.unwrap_or(settings.settle_delay_secs));

    let policy = CacheControlPolicy::from_config(&session.config.cache)?;
    let names = NameSource::from_path(&names_file)?;
    let keys = names.prefix(name_count)?;

    // One batch per pass over the names
    let sink = Arc::new(CollectingSink::new());
    let timer = Arc::new(ResponseTimer::new(name_count)?.with_sink(sink.clone()));

    let mut client = session.client()?;
    client.register_observer(timer.clone());

    info(&format!(
        "{} loop(s) of {} name(s) against {}",
        loop_count, name_count, session.base_url
    ));

    let driver = BenchmarkDriver::new(client, policy)
        .with_settle_delay(settle)
        .with_progress(create_progress_bar());
    let summary = driver.run(loop_count, name_count, keys)?;

    print_loops(&summary);
    print_batches(&sink.reports());

    if summary.total_failures() > 0 {
        warning(&format!(
            "{} of {} searches failed",
            summary.total_failures(),
            summary.total_calls()
        ));
    } else {
        success(&format!("{} searches completed", summary.total_calls()));
    }

    Ok(())
}

fn create_progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    if let Ok(style) =
        ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {pos:>5}/{len:5} ({eta})")
    {
        pb.set_style(style.progress_chars("━━─"));
    }
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn print_loops(summary: &RunSummary) {
    section_header("Loops");

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Loop"),
        header_cell("Cache"),
        header_cell("Succeeded"),
        header_cell("Failed"),
    ]);
    for outcome in &summary.loops {
        table.add_row(vec![
            Cell::new(outcome.index + 1),
            Cell::new(if outcome.cache_disabled { "bypassed" } else { "allowed" }),
            Cell::new(outcome.succeeded),
            Cell::new(outcome.failed),
        ]);
    }
    println!("{}", table);
}

fn print_batches(reports: &[BatchReport]) {
    section_header("Batch averages");

    if reports.is_empty() {
        empty("No batch completed");
        return;
    }

    let mut table = create_standard_table();
    table.set_header(vec![
        header_cell("Batch"),
        header_cell("Average"),
        header_cell("Total"),
        header_cell("Size"),
        header_cell("Completed"),
    ]);
    for report in reports {
        table.add_row(vec![
            Cell::new(report.batch_index),
            Cell::new(format_millis(report.average_millis)),
            Cell::new(format_millis(report.total_millis)),
            Cell::new(report.batch_size),
            Cell::new(report.emitted_at.format("%H:%M:%S%.3f")),
        ]);
    }
    println!("{}", table);
}
