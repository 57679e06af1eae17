//! Search for patients by family name and render them, sorted by first name
use crate::client::SearchTransport;
use fhirtime_core::{CacheDirective, MalformedResponseError, PersonRecord};

const RECORD_SEPARATOR: &str = "-------------------------";

/// Search-and-print entry point; does not take part in timing
pub struct PatientSearch<T> {
    transport: T,
}

impl<T: SearchTransport> PatientSearch<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Search with default caching, sort by the given name that goes with
    /// `family` (case-insensitive) and log each record.
    ///
    /// Any failure is logged and yields `None`.
    pub fn search_and_print(&self, family: &str) -> Option<Vec<PersonRecord>> {
        let mut records = match self.transport.search(family, &CacheDirective::allow()) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(family, error = %e, "error interacting with FHIR server");
                return None;
            }
        };

        sort_by_given_name(&mut records, family);

        for record in &records {
            match render_record(record, family) {
                Ok(Some(rendered)) => {
                    for line in rendered.lines() {
                        tracing::info!("{}", line);
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!(family, error = %e, "response format not as expected");
                    return None;
                }
            }
        }

        Some(records)
    }
}

/// Stable sort on the uppercased first given name of the matching family name
pub fn sort_by_given_name(records: &mut [PersonRecord], family: &str) {
    records.sort_by_key(|record| record.sort_key_for(family));
}

/// Render the name matching `family`; records without one are skipped
pub fn render_record(
    record: &PersonRecord,
    family: &str,
) -> Result<Option<String>, MalformedResponseError> {
    let Some(name) = record.name_for_family(family) else {
        return Ok(None);
    };
    let given = name
        .first_given()
        .ok_or_else(|| MalformedResponseError::MissingGivenName {
            record: record.label().to_string(),
        })?;

    Ok(Some(format!(
        "First Name: {}\nLast Name: {}\nBirth Date: {}\n{}",
        given,
        name.family.as_deref().unwrap_or_default(),
        record
            .birth_date
            .as_deref()
            .unwrap_or("Not available in records"),
        RECORD_SEPARATOR
    )))
}
