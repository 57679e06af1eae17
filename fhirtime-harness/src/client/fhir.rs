//! FHIR REST client for patient searches
use super::{ObserverChain, ResponseEvent, ResponseObserver, SearchTransport};
use fhirtime_core::{
    BenchError, BenchResult, CacheDirective, PersonRecord, ServerConfig, TransportError,
};
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

const FHIR_JSON: &str = "application/fhir+json";

/// Search bundle, first page only
#[derive(Debug, Deserialize)]
struct Bundle {
    #[serde(rename = "resourceType")]
    resource_type: String,
    #[serde(default)]
    entry: Vec<BundleEntry>,
}

#[derive(Debug, Deserialize)]
struct BundleEntry {
    #[serde(default)]
    resource: Option<serde_json::Value>,
}

/// FHIR server client
pub struct FhirClient {
    base_url: Url,
    client: reqwest::blocking::Client,
    observers: ObserverChain,
    validate_server: bool,
    validated: AtomicBool,
}

impl FhirClient {
    /// Create a new client for the server at `base_url`
    pub fn new(base_url: &str, config: &ServerConfig) -> BenchResult<Self> {
        let mut base = Url::parse(base_url).map_err(|e| {
            BenchError::Configuration(format!("Invalid FHIR base URL '{}': {}", base_url, e))
        })?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| BenchError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base,
            client,
            observers: ObserverChain::new(),
            validate_server: config.validate_server,
            validated: AtomicBool::new(false),
        })
    }

    /// Register an observer for every response this client receives
    pub fn register_observer(&mut self, observer: Arc<dyn ResponseObserver>) {
        self.observers.register(observer);
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TransportError> {
        self.base_url
            .join(path)
            .map_err(|e| TransportError::Request(format!("cannot build URL for {}: {}", path, e)))
    }

    fn search_url(&self, family: &str) -> Result<Url, TransportError> {
        let mut url = self.endpoint("Patient")?;
        url.query_pairs_mut().append_pair("family", family);
        Ok(url)
    }

    /// Fetch the capability statement once, before the first search.
    ///
    /// Like any other exchange it reaches the observers, where it accounts
    /// for the connection set-up cost. Once an answer arrived, whatever its
    /// status, it is never fetched again; only a failure that reached no
    /// observer leaves the fetch pending for the next search.
    fn ensure_validated(&self) -> Result<(), TransportError> {
        if !self.validate_server || self.validated.load(Ordering::Acquire) {
            return Ok(());
        }

        let url = self.endpoint("metadata")?;
        match self.exchange(url, None, &CacheDirective::allow()) {
            Ok(_) => {
                tracing::debug!(base = %self.base_url, "server capability statement fetched");
            }
            Err(e @ TransportError::Status { .. }) => {
                tracing::warn!(
                    base = %self.base_url,
                    error = %e,
                    "capability statement unavailable, searching anyway"
                );
            }
            Err(e) => return Err(e),
        }
        self.validated.store(true, Ordering::Release);
        Ok(())
    }

    /// One GET; observers see the response whatever its status
    fn exchange(
        &self,
        url: Url,
        key: Option<&str>,
        directive: &CacheDirective,
    ) -> Result<String, TransportError> {
        let mut request = self.client.get(url.clone()).header(ACCEPT, FHIR_JSON);
        if let Some(value) = directive.header_value() {
            request = request.header(CACHE_CONTROL, value);
        }

        let started = Instant::now();
        let response = request.send().map_err(|e| classify(e, &url))?;
        let status = response.status();
        let body = response.text().map_err(|e| classify(e, &url))?;
        let elapsed = started.elapsed();

        self.observers.notify(&ResponseEvent {
            url: url.to_string(),
            key: key.map(str::to_string),
            status: status.as_u16(),
            elapsed_millis: i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX),
            directive: *directive,
        });

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(body)
    }
}

impl SearchTransport for FhirClient {
    fn search(
        &self,
        key: &str,
        directive: &CacheDirective,
    ) -> Result<Vec<PersonRecord>, TransportError> {
        self.ensure_validated()?;

        let url = self.search_url(key)?;
        let body = self.exchange(url, Some(key), directive)?;
        parse_bundle(&body)
    }
}

impl std::fmt::Debug for FhirClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FhirClient")
            .field("base_url", &self.base_url.as_str())
            .field("observers", &self.observers)
            .field("validate_server", &self.validate_server)
            .finish()
    }
}

fn classify(err: reqwest::Error, url: &Url) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(url.to_string())
    } else if err.is_connect() {
        TransportError::Connect(url.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportError::Malformed(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

/// Extract patient records from a search bundle; other resources are skipped
fn parse_bundle(body: &str) -> Result<Vec<PersonRecord>, TransportError> {
    let bundle: Bundle = serde_json::from_str(body)
        .map_err(|e| TransportError::Malformed(format!("invalid bundle JSON: {}", e)))?;

    if bundle.resource_type != "Bundle" {
        return Err(TransportError::Malformed(format!(
            "expected a Bundle, got {}",
            bundle.resource_type
        )));
    }

    let mut records = Vec::with_capacity(bundle.entry.len());
    for resource in bundle.entry.into_iter().filter_map(|entry| entry.resource) {
        if resource.get("resourceType").and_then(|t| t.as_str()) != Some("Patient") {
            continue;
        }
        let record: PersonRecord = serde_json::from_value(resource)
            .map_err(|e| TransportError::Malformed(format!("invalid Patient resource: {}", e)))?;
        records.push(record);
    }

    Ok(records)
}
