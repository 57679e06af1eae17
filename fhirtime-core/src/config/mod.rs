//! Configuration types for fhirtime

pub mod properties;

use crate::BenchError;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub use properties::{resolve_base_url, Properties, BASE_URL_KEY};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub benchmark: BenchmarkConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// FHIR server base URL, e.g. http://hapi.fhir.org/baseR4
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Fetch the capability statement once before the first search
    #[serde(default = "default_validate_server")]
    pub validate_server: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    #[serde(default = "default_loop_count")]
    pub loop_count: usize,
    #[serde(default = "default_name_count")]
    pub name_count: usize,
    /// Pause between loops so server-side caches can settle
    #[serde(default = "default_settle_delay_secs")]
    pub settle_delay_secs: u64,
    #[serde(default = "default_names_file")]
    pub names_file: String,
}

/// Which directives a "disable cache" request carries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CacheConfig {
    #[serde(default = "default_no_store")]
    pub no_store: bool,
    #[serde(default = "default_no_cache")]
    pub no_cache: bool,
}

// Default value functions
fn default_timeout_secs() -> u64 { 60 }
fn default_connect_timeout_secs() -> u64 { 30 }
fn default_user_agent() -> String { format!("fhirtime/{}", crate::VERSION) }
fn default_validate_server() -> bool { true }
fn default_loop_count() -> usize { 3 }
fn default_name_count() -> usize { 20 }
fn default_settle_delay_secs() -> u64 { 10 }
fn default_names_file() -> String { "names.txt".to_string() }
fn default_no_store() -> bool { true }
fn default_no_cache() -> bool { false }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
            validate_server: default_validate_server(),
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            loop_count: default_loop_count(),
            name_count: default_name_count(),
            settle_delay_secs: default_settle_delay_secs(),
            names_file: default_names_file(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            no_store: default_no_store(),
            no_cache: default_no_cache(),
        }
    }
}

pub fn default_config() -> Config {
    Config::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, BenchError> {
    let contents = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&contents)
        .map_err(|e| BenchError::Configuration(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(path: P, config: &Config) -> Result<(), BenchError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| BenchError::Configuration(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}
