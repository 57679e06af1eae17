use serde::{Deserialize, Serialize};

/// A person's name as carried by a FHIR `HumanName`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HumanName {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub given: Vec<String>,
}

impl HumanName {
    pub fn new(family: &str, given: &[&str]) -> Self {
        Self {
            family: Some(family.to_string()),
            given: given.iter().map(|g| g.to_string()).collect(),
        }
    }

    /// Case-insensitive family match; a name without a family never matches
    pub fn has_family(&self, family: &str) -> bool {
        self.family
            .as_deref()
            .map(|f| f.to_lowercase() == family.to_lowercase())
            .unwrap_or(false)
    }

    pub fn first_given(&self) -> Option<&str> {
        self.given.first().map(String::as_str)
    }
}

/// Patient record returned by a search, reduced to the fields we render
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "name", default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<HumanName>,
    #[serde(rename = "birthDate", default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl PersonRecord {
    pub fn with_names(names: Vec<HumanName>) -> Self {
        Self {
            id: None,
            names,
            birth_date: None,
        }
    }

    /// First name entry whose family matches `family`
    pub fn name_for_family(&self, family: &str) -> Option<&HumanName> {
        self.names.iter().find(|name| name.has_family(family))
    }

    /// Uppercased first given name among the names matching `family`,
    /// or an empty string when there is none
    pub fn sort_key_for(&self, family: &str) -> String {
        self.names
            .iter()
            .filter(|name| name.has_family(family))
            .flat_map(|name| name.given.iter())
            .map(|given| given.to_uppercase())
            .next()
            .unwrap_or_default()
    }

    /// Identifier used in logs and error messages
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unidentified>")
    }
}
