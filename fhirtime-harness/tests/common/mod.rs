#![allow(dead_code)]

//! Shared fixtures for fhirtime-harness integration tests
use fhirtime_harness::{
    CacheDirective, HumanName, ObserverChain, PersonRecord, ResponseEvent, ResponseObserver,
    SearchTransport, TransportError,
};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;

/// One call seen by a [`ScriptedTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub key: String,
    pub directive: CacheDirective,
}

/// In-memory transport that replays scripted latencies to its observers.
///
/// The first call also plays a handshake exchange, the way the HTTP client
/// fetches the capability statement before its first search.
pub struct ScriptedTransport {
    calls: Mutex<Vec<RecordedCall>>,
    latencies: Mutex<VecDeque<i64>>,
    handshake_millis: Option<i64>,
    handshake_done: Mutex<bool>,
    observers: ObserverChain,
    fail_with: Option<TransportError>,
    records: Vec<PersonRecord>,
}

impl ScriptedTransport {
    pub fn succeeding() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            latencies: Mutex::new(VecDeque::new()),
            handshake_millis: None,
            handshake_done: Mutex::new(false),
            observers: ObserverChain::new(),
            fail_with: None,
            records: Vec::new(),
        }
    }

    pub fn failing(error: TransportError) -> Self {
        Self {
            fail_with: Some(error),
            ..Self::succeeding()
        }
    }

    pub fn with_records(mut self, records: Vec<PersonRecord>) -> Self {
        self.records = records;
        self
    }

    /// Latencies reported for successive searches, in order
    pub fn with_latencies(self, latencies: &[i64]) -> Self {
        *self.latencies.lock() = latencies.iter().copied().collect();
        self
    }

    pub fn with_handshake(mut self, millis: i64) -> Self {
        self.handshake_millis = Some(millis);
        self
    }

    pub fn observe(mut self, observer: Arc<dyn ResponseObserver>) -> Self {
        self.observers.register(observer);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }
}

impl SearchTransport for ScriptedTransport {
    fn search(
        &self,
        key: &str,
        directive: &CacheDirective,
    ) -> Result<Vec<PersonRecord>, TransportError> {
        self.calls.lock().push(RecordedCall {
            key: key.to_string(),
            directive: *directive,
        });

        if let Some(error) = &self.fail_with {
            return Err(error.clone());
        }

        if let Some(millis) = self.handshake_millis {
            let mut done = self.handshake_done.lock();
            if !*done {
                *done = true;
                self.observers.notify(&ResponseEvent {
                    url: "scripted://metadata".to_string(),
                    key: None,
                    status: 200,
                    elapsed_millis: millis,
                    directive: CacheDirective::allow(),
                });
            }
        }

        let elapsed_millis = self.latencies.lock().pop_front().unwrap_or(0);
        self.observers.notify(&ResponseEvent {
            url: format!("scripted://Patient?family={}", key),
            key: Some(key.to_string()),
            status: 200,
            elapsed_millis,
            directive: *directive,
        });

        Ok(self.records.clone())
    }
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// The three Smith records: two plain, one carrying a second name
pub fn smith_family() -> Vec<PersonRecord> {
    vec![
        PersonRecord {
            id: Some("john".to_string()),
            names: vec![HumanName::new("Smith", &["John"])],
            birth_date: Some("1971-03-04".to_string()),
        },
        PersonRecord {
            id: Some("adam".to_string()),
            names: vec![HumanName::new("Smith", &["Adam"])],
            birth_date: None,
        },
        PersonRecord {
            id: Some("carol".to_string()),
            names: vec![
                HumanName::new("Warden", &["Carol"]),
                HumanName::new("Smith", &["Becky"]),
            ],
            birth_date: None,
        },
    ]
}

/// Search bundle JSON for a list of (family, given) patients
pub fn bundle_json(patients: &[(&str, &str)]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = patients
        .iter()
        .enumerate()
        .map(|(i, (family, given))| {
            serde_json::json!({
                "fullUrl": format!("http://fhir.test/Patient/{}", i),
                "resource": {
                    "resourceType": "Patient",
                    "id": i.to_string(),
                    "name": [{"family": family, "given": [given]}]
                }
            })
        })
        .collect();

    serde_json::json!({
        "resourceType": "Bundle",
        "type": "searchset",
        "total": patients.len(),
        "entry": entries
    })
}
