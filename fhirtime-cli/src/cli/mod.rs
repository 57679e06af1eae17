pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "fhirtime",
    version,
    about = "Response-time and cache-behaviour benchmarking for FHIR patient search",
    long_about = "fhirtime searches a FHIR server for patients by family name, repeatedly, \
                  and reports batch-averaged response times. Every loop but the last lets \
                  the server cache; the last one asks it not to."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Properties file consulted for FHIR_BASE_URL when no other source sets it
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        default_value = "application.properties"
    )]
    pub properties: PathBuf,

    /// FHIR server base URL, e.g. http://hapi.fhir.org/baseR4
    #[arg(long, global = true, env = "FHIR_BASE_URL", value_name = "URL")]
    pub base_url: Option<String>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search patients by family name and print them sorted by first name
    Search(commands::search::SearchArgs),

    /// Time repeated searches over a list of family names
    Time(commands::time::TimeArgs),
}
