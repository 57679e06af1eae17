#![allow(dead_code)]

use anyhow::Result;
use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The `fhirtime` binary with no base URL leaking in from the environment
pub fn fhirtime_cmd() -> Command {
    let mut cmd = Command::cargo_bin("fhirtime").unwrap();
    cmd.env_remove("FHIR_BASE_URL")
        .env_remove("RUST_LOG")
        .env("FHIRTIME_LOG", "warn");
    cmd
}

/// Search bundle with one patient per (family, given) pair
pub fn bundle_json(names: &[(&str, &str)]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = names
        .iter()
        .enumerate()
        .map(|(i, (family, given))| {
            serde_json::json!({
                "resource": {
                    "resourceType": "Patient",
                    "id": format!("p{}", i),
                    "name": [{"family": family, "given": [given]}]
                }
            })
        })
        .collect();

    serde_json::json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "entry": entries
    })
}

/// Scratch directory working as the command's current directory
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        Ok(Self {
            temp_dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn create_file(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, content)?;
        Ok(path)
    }

    pub fn create_names_file(&self, names: &[&str]) -> Result<PathBuf> {
        self.create_file("names.txt", &format!("{}\n", names.join("\n")))
    }

    /// Config pointing at `base_url`; server validation is switched off
    pub fn create_config(&self, base_url: &str) -> Result<PathBuf> {
        self.create_file(
            "fhirtime.toml",
            &format!(
                "[server]\nbase_url = \"{}\"\nvalidate_server = false\ntimeout_secs = 5\n",
                base_url
            ),
        )
    }

    /// A properties file with the given base URL value
    pub fn create_properties(&self, value: &str) -> Result<PathBuf> {
        self.create_file(
            "application.properties",
            &format!("# server\nFHIR_BASE_URL={}\n", value),
        )
    }
}
