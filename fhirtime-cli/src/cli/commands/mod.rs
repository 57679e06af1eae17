pub mod search;
pub mod time;

use crate::cli::Cli;
use fhirtime_core::{load_config, resolve_base_url, BenchResult, Config};
use fhirtime_harness::{FhirClient, RequestLogger};
use std::sync::Arc;

/// Settings every command needs, resolved once from flags, files and environment
pub struct Session {
    pub config: Config,
    pub base_url: String,
}

impl Session {
    pub fn from_cli(cli: &Cli) -> BenchResult<Self> {
        let config = match &cli.config {
            Some(path) => load_config(path)?,
            None => Config::default(),
        };
        let base_url = resolve_base_url(cli.base_url.as_deref(), &config, &cli.properties)?;
        tracing::debug!(base_url = %base_url, "using FHIR server");

        Ok(Self { config, base_url })
    }

    /// HTTP client for the configured server, with request logging attached
    pub fn client(&self) -> BenchResult<FhirClient> {
        let mut client = FhirClient::new(&self.base_url, &self.config.server)?;
        client.register_observer(Arc::new(RequestLogger));
        Ok(client)
    }
}
