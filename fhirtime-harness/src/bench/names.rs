use fhirtime_core::{BenchError, BenchResult};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Ordered search keys read from a newline-delimited list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSource {
    names: Vec<String>,
}

impl NameSource {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    /// Read one key per line; blank lines and `#` comments are skipped
    pub fn from_path<P: AsRef<Path>>(path: P) -> BenchResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BenchError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open name list {}: {}", path.display(), e),
            ))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> BenchResult<Self> {
        let mut names = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            names.push(trimmed.to_string());
        }
        Ok(Self { names })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The first `count` keys; fewer available is a configuration error
    pub fn prefix(&self, count: usize) -> BenchResult<&[String]> {
        self.names.get(..count).ok_or_else(|| {
            BenchError::Configuration(format!(
                "{} names requested but the list only has {}",
                count,
                self.names.len()
            ))
        })
    }
}
