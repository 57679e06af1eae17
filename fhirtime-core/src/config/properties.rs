//! Java-style `.properties` files, the historical home of `FHIR_BASE_URL`.

use crate::{BenchError, BenchResult, Config};
use std::collections::HashMap;
use std::path::Path;

/// Key holding the FHIR server base URL
pub const BASE_URL_KEY: &str = "FHIR_BASE_URL";

/// Flat key/value store parsed from a properties file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Load properties from a file
    pub fn load<P: AsRef<Path>>(path: P) -> BenchResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BenchError::Configuration(format!(
                "Configuration file '{}' not found: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self::parse(&contents))
    }

    /// Parse `key=value`, `key: value` and `key value` lines.
    ///
    /// Lines starting with `#` or `!` are comments. A trailing backslash
    /// joins the next line onto the current value.
    pub fn parse(contents: &str) -> Self {
        let mut values = HashMap::new();
        let mut pending = String::new();

        for raw in contents.lines() {
            let line = raw.trim_start();
            let comment = line.starts_with('#') || line.starts_with('!');
            if pending.is_empty() && (line.is_empty() || comment) {
                continue;
            }

            if let Some(stripped) = line.strip_suffix('\\') {
                pending.push_str(stripped);
                continue;
            }
            pending.push_str(line);

            let (key, value) = split_entry(&pending);
            values.insert(key.to_string(), value.to_string());
            pending.clear();
        }

        if !pending.is_empty() {
            let (key, value) = split_entry(&pending);
            values.insert(key.to_string(), value.to_string());
        }

        Self { values }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`; a present but blank key yields an empty string
    pub fn require(&self, key: &str) -> BenchResult<&str> {
        self.get(key).ok_or_else(|| {
            BenchError::Configuration(format!("Configuration key '{}' not found", key))
        })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

fn split_entry(line: &str) -> (&str, &str) {
    match line.find(|c: char| c == '=' || c == ':' || c.is_whitespace()) {
        Some(idx) => {
            let key = line[..idx].trim_end();
            let mut rest = line[idx..].trim_start();
            if let Some(stripped) = rest.strip_prefix(|c: char| c == '=' || c == ':') {
                rest = stripped.trim_start();
            }
            (key, rest.trim_end())
        }
        None => (line.trim_end(), ""),
    }
}

/// Resolve the FHIR base URL.
///
/// Precedence: an explicit value (command line or environment), then
/// `[server].base_url` from the TOML config, then `FHIR_BASE_URL` in the
/// properties file. Failing all three is fatal.
pub fn resolve_base_url(
    explicit: Option<&str>,
    config: &Config,
    properties_path: &Path,
) -> BenchResult<String> {
    let candidate = explicit
        .map(str::to_string)
        .filter(|url| !url.trim().is_empty())
        .or_else(|| config.server.base_url.clone())
        .filter(|url| !url.trim().is_empty());

    if let Some(url) = candidate {
        return Ok(url.trim().to_string());
    }

    let properties = Properties::load(properties_path)?;
    let url = properties.require(BASE_URL_KEY)?.trim();
    if url.is_empty() {
        return Err(BenchError::Configuration(format!(
            "Configuration key '{}' is blank in {}",
            BASE_URL_KEY,
            properties_path.display()
        )));
    }

    tracing::debug!(path = %properties_path.display(), "base URL taken from properties file");
    Ok(url.to_string())
}
